use std::io;

use thiserror::Error;

use crate::domain::{EntryId, EntryKind, ValidationError};
use crate::errors::StoreError;

/// Failures reported by the ledger engine.
///
/// Validation, addressing and storage failures are soft: the engine reports
/// them to the caller and leaves the stored collections unchanged.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{kind} index {index} is out of range (collection holds {len} entries)")]
    IndexOutOfRange {
        kind: EntryKind,
        index: usize,
        len: usize,
    },
    #[error("{kind} entry {id} no longer exists")]
    EntryNotFound { kind: EntryKind, id: EntryId },
    #[error("pending edit targets a {pending} entry but a {submitted} was submitted")]
    EditKindMismatch {
        pending: EntryKind,
        submitted: EntryKind,
    },
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BudgetError {
    /// Returns true for failures the caller can recover from inline.
    pub fn is_soft(&self) -> bool {
        !matches!(self, BudgetError::Config(_))
    }
}

impl From<StoreError> for BudgetError {
    fn from(err: StoreError) -> Self {
        BudgetError::StorageUnavailable(err.to_string())
    }
}

impl From<io::Error> for BudgetError {
    fn from(err: io::Error) -> Self {
        BudgetError::StorageUnavailable(err.to_string())
    }
}

/// Top-level failures that abort the command shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Budget(#[from] BudgetError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("{0}")]
    Command(String),
}
