//! Domain model for ledger entries and their submit-time validation.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    category::CategoryCatalog,
    common::{Amounted, Displayable, Identifiable},
};

/// Stable identifier assigned to an entry when it is created.
pub type EntryId = Uuid;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Which collection an entry lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub const ALL: [EntryKind; 2] = [EntryKind::Expense, EntryKind::Income];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Expense => "expense",
            EntryKind::Income => "income",
        }
    }

    /// Capitalised label used in listings and messages.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Expense => "Expense",
            EntryKind::Income => "Income",
        }
    }

    /// Store key holding the collection for this kind.
    pub fn storage_key(self) -> &'static str {
        match self {
            EntryKind::Expense => "expenses",
            EntryKind::Income => "incomes",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entry type `{0}` (expected `expense` or `income`)")]
pub struct ParseKindError(pub String);

impl FromStr for EntryKind {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" | "expenses" => Ok(EntryKind::Expense),
            "income" | "incomes" => Ok(EntryKind::Income),
            _ => Err(ParseKindError(value.to_string())),
        }
    }
}

/// A single financial transaction held in one of the two collections.
///
/// Deserialization is lenient because stored payloads carry no schema: a
/// missing or non-numeric amount reads as zero and non-string text fields
/// read as empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    #[serde(default = "Uuid::new_v4")]
    pub id: EntryId,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_note")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
}

impl Entry {
    /// Parsed view of the stored ISO date, `None` when it does not parse.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), ISO_DATE_FORMAT).ok()
    }

    /// The `YYYY-MM` prefix of the stored date.
    pub fn month(&self) -> Option<&str> {
        self.date.get(..7)
    }

    pub fn note_text(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }

    /// Lowercased `category note` text matched by free-text search.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.category, self.note_text()).to_lowercase()
    }
}

impl Identifiable for Entry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Entry {
    fn amount(&self) -> f64 {
        if self.amount.is_finite() {
            self.amount
        } else {
            0.0
        }
    }
}

impl Displayable for Entry {
    fn display_label(&self) -> String {
        format!("{} {:.2} on {}", self.category, self.amount(), self.date)
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let amount = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if amount.is_finite() { amount } else { 0.0 })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient_note<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_text(deserializer)?;
    Ok(if text.is_empty() { None } else { Some(text) })
}

/// Command object handing an entry from a listing to the next submit.
///
/// Carries the target's stable identifier, so it stays valid across
/// reordering, and is consumed exactly once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditRequest {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub id: EntryId,
}

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Amount,
    Category,
    Date,
}

impl fmt::Display for EntryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryField::Amount => "amount",
            EntryField::Category => "category",
            EntryField::Date => "date",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: EntryField,
    pub message: String,
}

/// Every field problem found in a rejected submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn has_issue(&self, field: EntryField) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self
            .issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect();
        f.write_str(&messages.join(" "))
    }
}

impl std::error::Error for ValidationError {}

/// Unvalidated form input for a new or replacement entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub amount: f64,
    pub category: String,
    pub note: Option<String>,
    pub date: String,
}

impl EntryDraft {
    pub fn new(amount: f64, category: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            note: None,
            date: date.into(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Checks the draft against the submit rules and builds a fresh entry.
    ///
    /// All failing fields are reported together.
    pub fn validate(
        &self,
        kind: EntryKind,
        catalog: &CategoryCatalog,
    ) -> Result<Entry, ValidationError> {
        let mut issues = Vec::new();

        if !(self.amount.is_finite() && self.amount > 0.0) {
            issues.push(FieldIssue {
                field: EntryField::Amount,
                message: "Please enter a valid amount.".into(),
            });
        }

        let category = self.category.trim();
        if category.is_empty() {
            issues.push(FieldIssue {
                field: EntryField::Category,
                message: "Please select a category.".into(),
            });
        } else if !catalog.contains(kind, category) {
            issues.push(FieldIssue {
                field: EntryField::Category,
                message: format!("`{category}` is not a known {kind} category."),
            });
        }

        let date = self.date.trim();
        if date.is_empty() {
            issues.push(FieldIssue {
                field: EntryField::Date,
                message: "Please select a date.".into(),
            });
        } else if NaiveDate::parse_from_str(date, ISO_DATE_FORMAT).is_err() {
            issues.push(FieldIssue {
                field: EntryField::Date,
                message: format!("`{date}` is not a date in YYYY-MM-DD form."),
            });
        }

        if !issues.is_empty() {
            return Err(ValidationError { issues });
        }

        let note = self
            .note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(str::to_string);

        Ok(Entry {
            id: Uuid::new_v4(),
            amount: self.amount,
            category: category.to_string(),
            note,
            date: date.to_string(),
        })
    }
}
