//! Fixed per-type category sets used when validating entries.

use serde::{Deserialize, Serialize};

use crate::domain::entry::EntryKind;

const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Housing",
    "Utilities",
    "Health",
    "Entertainment",
    "Shopping",
    "Education",
    "Other",
];

const DEFAULT_INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelance",
    "Business",
    "Investment",
    "Gift",
    "Other",
];

/// Category names accepted for each entry type.
///
/// An empty list leaves that type unrestricted: any non-empty name is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCatalog {
    #[serde(default = "CategoryCatalog::default_expense")]
    pub expense: Vec<String>,
    #[serde(default = "CategoryCatalog::default_income")]
    pub income: Vec<String>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            expense: Self::default_expense(),
            income: Self::default_income(),
        }
    }
}

impl CategoryCatalog {
    pub fn default_expense() -> Vec<String> {
        DEFAULT_EXPENSE_CATEGORIES
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn default_income() -> Vec<String> {
        DEFAULT_INCOME_CATEGORIES
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Catalog that accepts any non-empty category for both types.
    pub fn unrestricted() -> Self {
        Self {
            expense: Vec::new(),
            income: Vec::new(),
        }
    }

    pub fn for_kind(&self, kind: EntryKind) -> &[String] {
        match kind {
            EntryKind::Expense => &self.expense,
            EntryKind::Income => &self.income,
        }
    }

    /// Returns true when `name` is an accepted category for `kind`.
    pub fn contains(&self, kind: EntryKind, name: &str) -> bool {
        let allowed = self.for_kind(kind);
        allowed.is_empty() || allowed.iter().any(|candidate| candidate == name)
    }
}
