use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Serialize;

use crate::core::services::query_service::{LedgerRow, Month, ParseQueryError};
use crate::domain::{Amounted, Entry, EntryKind};

/// Income, expense and balance sums.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl Totals {
    pub fn new(income: f64, expense: f64) -> Self {
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// Per-category sums for the report view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub expense: f64,
    pub income: f64,
}

/// Which series the report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportView {
    #[default]
    Both,
    Expenses,
    Income,
}

impl FromStr for ReportView {
    type Err = ParseQueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "both" | "all" => Ok(ReportView::Both),
            "expenses" | "expense" => Ok(ReportView::Expenses),
            "income" | "incomes" => Ok(ReportView::Income),
            _ => Err(ParseQueryError {
                what: "report view",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportView::Both => "income & expenses",
            ReportView::Expenses => "expenses",
            ReportView::Income => "income",
        };
        f.write_str(label)
    }
}

/// Category report over one filtered query.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub month: Option<Month>,
    pub totals: Totals,
    pub categories: Vec<CategoryAggregate>,
}

impl Report {
    /// True when there is nothing to chart for `view`.
    pub fn is_empty_for(&self, view: ReportView) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        match view {
            ReportView::Both => false,
            ReportView::Expenses => self.categories.iter().all(|agg| agg.expense == 0.0),
            ReportView::Income => self.categories.iter().all(|agg| agg.income == 0.0),
        }
    }
}

/// Pure reductions over collections and query output.
pub struct SummaryService;

impl SummaryService {
    /// Sum of amounts; non-finite amounts count as zero.
    pub fn sum<'a, A, I>(items: I) -> f64
    where
        A: Amounted + 'a,
        I: IntoIterator<Item = &'a A>,
    {
        items.into_iter().map(Amounted::amount).sum()
    }

    /// Totals over the full, unfiltered collections.
    pub fn global_totals(expenses: &[Entry], incomes: &[Entry]) -> Totals {
        Totals::new(Self::sum(incomes), Self::sum(expenses))
    }

    /// Totals restricted to the rows a query produced.
    pub fn filtered_totals(rows: &[LedgerRow]) -> Totals {
        let of_kind =
            |kind: EntryKind| Self::sum(rows.iter().filter(move |row| row.kind == kind));
        Totals::new(of_kind(EntryKind::Income), of_kind(EntryKind::Expense))
    }

    /// Groups rows by category, ascending by name.
    pub fn category_aggregates(rows: &[LedgerRow]) -> Vec<CategoryAggregate> {
        let mut buckets: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for row in rows {
            let bucket = buckets.entry(row.entry.category.as_str()).or_default();
            match row.kind {
                EntryKind::Expense => bucket.0 += row.amount(),
                EntryKind::Income => bucket.1 += row.amount(),
            }
        }
        buckets
            .into_iter()
            .map(|(category, (expense, income))| CategoryAggregate {
                category: category.to_string(),
                expense,
                income,
            })
            .collect()
    }

    pub fn report(rows: &[LedgerRow], month: Option<Month>) -> Report {
        Report {
            month,
            totals: Self::filtered_totals(rows),
            categories: Self::category_aggregates(rows),
        }
    }
}
