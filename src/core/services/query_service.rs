//! Filter and sort pipeline over the merged expense/income view.
//!
//! Filters are independent conjunctive predicates; only the sort stage is
//! order-sensitive and it always runs last.

use std::{cmp::Reverse, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{Amounted, Entry, EntryKind};

/// One entry of the merged view, tagged with its collection and the index it
/// had when the view was built.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub entry: Entry,
    pub kind: EntryKind,
    pub index: usize,
}

impl LedgerRow {
    /// Position in the merged view: every expense precedes every income.
    pub fn position(&self) -> (EntryKind, usize) {
        (self.kind, self.index)
    }
}

impl Amounted for LedgerRow {
    fn amount(&self) -> f64 {
        self.entry.amount()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {what} `{value}`")]
pub struct ParseQueryError {
    pub what: &'static str,
    pub value: String,
}

impl ParseQueryError {
    fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}

/// Type stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(EntryKind),
}

impl FromStr for KindFilter {
    type Err = ParseQueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        value
            .parse::<EntryKind>()
            .map(KindFilter::Only)
            .map_err(|_| ParseQueryError::new("type filter", value))
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindFilter::All => f.write_str("all"),
            KindFilter::Only(kind) => write!(f, "{kind}"),
        }
    }
}

/// Category stage; the `All` sentinel disables it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "All" {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(trimmed.to_string())
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Named(name) => f.write_str(name),
        }
    }
}

/// A calendar month in `YYYY-MM` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(String);

impl Month {
    pub fn of(date: NaiveDate) -> Self {
        Month(format!("{:04}-{:02}", date.year(), date.month()))
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Month {
    type Err = ParseQueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let first_day = format!("{trimmed}-01");
        if trimmed.len() != 7 || NaiveDate::parse_from_str(&first_day, "%Y-%m-%d").is_err() {
            return Err(ParseQueryError::new("month", value));
        }
        Ok(Month(trimmed.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final ordering applied to the filtered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::DateDesc,
        SortOrder::DateAsc,
        SortOrder::AmountDesc,
        SortOrder::AmountAsc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::DateDesc => "date-desc",
            SortOrder::DateAsc => "date-asc",
            SortOrder::AmountDesc => "amount-desc",
            SortOrder::AmountAsc => "amount-asc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseQueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == needle)
            .ok_or_else(|| ParseQueryError::new("sort order", value))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single active predicate of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterStage {
    Kind(EntryKind),
    Category(String),
    /// Lowercased, trimmed needle over category and note.
    Text(String),
    /// Lowercased, trimmed needle over the category alone.
    CategoryText(String),
    Month(Month),
}

impl FilterStage {
    pub fn matches(&self, row: &LedgerRow) -> bool {
        match self {
            FilterStage::Kind(kind) => row.kind == *kind,
            FilterStage::Category(name) => row.entry.category == *name,
            FilterStage::Text(needle) => row.entry.search_text().contains(needle.as_str()),
            FilterStage::CategoryText(needle) => {
                row.entry.category.to_lowercase().contains(needle.as_str())
            }
            FilterStage::Month(month) => row.entry.month() == Some(month.as_str()),
        }
    }
}

/// Selection applied to the merged view before sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub kind: KindFilter,
    pub category: CategoryFilter,
    pub text: String,
    pub category_text: String,
    pub month: Option<Month>,
}

impl FilterSpec {
    /// Spec that passes every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = KindFilter::Only(kind);
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = CategoryFilter::parse(category);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_category_text(mut self, text: impl Into<String>) -> Self {
        self.category_text = text.into();
        self
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    /// Active stages in pipeline order: type, category, text, category text,
    /// month.
    pub fn stages(&self) -> Vec<FilterStage> {
        let mut stages = Vec::new();
        if let KindFilter::Only(kind) = self.kind {
            stages.push(FilterStage::Kind(kind));
        }
        if let CategoryFilter::Named(name) = &self.category {
            stages.push(FilterStage::Category(name.clone()));
        }
        let needle = self.text.trim().to_lowercase();
        if !needle.is_empty() {
            stages.push(FilterStage::Text(needle));
        }
        let needle = self.category_text.trim().to_lowercase();
        if !needle.is_empty() {
            stages.push(FilterStage::CategoryText(needle));
        }
        if let Some(month) = &self.month {
            stages.push(FilterStage::Month(month.clone()));
        }
        stages
    }

    pub fn matches(&self, row: &LedgerRow) -> bool {
        self.stages().iter().all(|stage| stage.matches(row))
    }
}

/// Runs the query pipeline over merged ledger rows.
pub struct QueryService;

impl QueryService {
    /// Concatenates both collections into the merged view, expenses first.
    pub fn merged_view(expenses: Vec<Entry>, incomes: Vec<Entry>) -> Vec<LedgerRow> {
        let tag = |kind: EntryKind| {
            move |(index, entry): (usize, Entry)| LedgerRow { entry, kind, index }
        };
        expenses
            .into_iter()
            .enumerate()
            .map(tag(EntryKind::Expense))
            .chain(incomes.into_iter().enumerate().map(tag(EntryKind::Income)))
            .collect()
    }

    /// Keeps the rows accepted by every stage, evaluated in the given order.
    pub fn apply_stages(rows: Vec<LedgerRow>, stages: &[FilterStage]) -> Vec<LedgerRow> {
        stages.iter().fold(rows, |rows, stage| {
            rows.into_iter().filter(|row| stage.matches(row)).collect()
        })
    }

    pub fn filter(rows: Vec<LedgerRow>, spec: &FilterSpec) -> Vec<LedgerRow> {
        Self::apply_stages(rows, &spec.stages())
    }

    /// Sorts in place. Unparseable dates order before every real date; ties
    /// fall back to merged-view position so opposite orders mirror each other.
    pub fn sort(rows: &mut [LedgerRow], order: SortOrder) {
        match order {
            SortOrder::DateAsc => {
                rows.sort_by_cached_key(|row| (row.entry.parsed_date(), row.position()))
            }
            SortOrder::DateDesc => {
                rows.sort_by_cached_key(|row| Reverse((row.entry.parsed_date(), row.position())))
            }
            SortOrder::AmountAsc => rows.sort_by(|a, b| compare_amount(a, b)),
            SortOrder::AmountDesc => rows.sort_by(|a, b| compare_amount(b, a)),
        }
    }

    /// Full pipeline: filter, then sort.
    pub fn run(rows: Vec<LedgerRow>, spec: &FilterSpec, order: SortOrder) -> Vec<LedgerRow> {
        let total = rows.len();
        let mut rows = Self::filter(rows, spec);
        Self::sort(&mut rows, order);
        debug!(total, kept = rows.len(), %order, "query evaluated");
        rows
    }
}

fn compare_amount(a: &LedgerRow, b: &LedgerRow) -> std::cmp::Ordering {
    a.amount()
        .total_cmp(&b.amount())
        .then_with(|| a.position().cmp(&b.position()))
}
