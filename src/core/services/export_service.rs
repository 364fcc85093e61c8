//! CSV rendering for history and report exports.
//!
//! Commas inside text fields become a single space; fields are never quoted.
//! Older exports were produced that way and downstream sheets rely on it.

use crate::core::services::query_service::{LedgerRow, Month};
use crate::core::services::summary_service::CategoryAggregate;
use crate::domain::Amounted;

pub const HISTORY_HEADER: &str = "Date,Category,Note,Amount,Type";
pub const REPORT_HEADER: &str = "Category,Expenses,Income";
pub const HISTORY_FILE_NAME: &str = "smart-budget-history.csv";
const REPORT_FILE_PREFIX: &str = "smart-budget-report";

/// Row layout of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvShape {
    History,
    Report,
}

impl CsvShape {
    pub fn header(self) -> &'static str {
        match self {
            CsvShape::History => HISTORY_HEADER,
            CsvShape::Report => REPORT_HEADER,
        }
    }

    /// Download name; report exports are suffixed with their month.
    pub fn file_name(self, month: Option<&Month>) -> String {
        match self {
            CsvShape::History => HISTORY_FILE_NAME.to_string(),
            CsvShape::Report => match month {
                Some(month) => format!("{REPORT_FILE_PREFIX}-{month}.csv"),
                None => format!("{REPORT_FILE_PREFIX}-all.csv"),
            },
        }
    }
}

/// Query output handed to the serializer; the variant selects the shape.
#[derive(Debug, Clone, Copy)]
pub enum ExportRows<'a> {
    History(&'a [LedgerRow]),
    Report(&'a [CategoryAggregate]),
}

impl ExportRows<'_> {
    pub fn shape(&self) -> CsvShape {
        match self {
            ExportRows::History(_) => CsvShape::History,
            ExportRows::Report(_) => CsvShape::Report,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ExportRows::History(rows) => rows.len(),
            ExportRows::Report(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct ExportService;

impl ExportService {
    /// Renders header plus one line per row, joined by `\n` with no trailing newline.
    pub fn to_csv(rows: ExportRows<'_>) -> String {
        let mut lines = vec![rows.shape().header().to_string()];
        match rows {
            ExportRows::History(rows) => lines.extend(rows.iter().map(Self::history_line)),
            ExportRows::Report(rows) => lines.extend(rows.iter().map(Self::report_line)),
        }
        lines.join("\n")
    }

    fn history_line(row: &LedgerRow) -> String {
        [
            Self::sanitize_field(&row.entry.date),
            Self::sanitize_field(&row.entry.category),
            Self::sanitize_field(row.entry.note_text()),
            Self::format_amount(row.amount()),
            row.kind.as_str().to_string(),
        ]
        .join(",")
    }

    fn report_line(aggregate: &CategoryAggregate) -> String {
        [
            Self::sanitize_field(&aggregate.category),
            Self::format_amount(aggregate.expense),
            Self::format_amount(aggregate.income),
        ]
        .join(",")
    }

    /// Replaces every comma with a single space.
    pub fn sanitize_field(text: &str) -> String {
        text.replace(',', " ")
    }

    /// Two decimals, no grouping, locale independent.
    pub fn format_amount(amount: f64) -> String {
        let amount = if amount.is_finite() && amount != 0.0 {
            amount
        } else {
            0.0
        };
        format!("{amount:.2}")
    }
}
