#![allow(dead_code)]

use std::sync::Arc;

use smart_budget::{
    core::ledger_manager::LedgerManager,
    domain::{CategoryCatalog, EntryDraft, EntryKind},
    storage::{JsonFileStore, MemoryStore},
};
use tempfile::TempDir;

/// Ledger over an in-memory store with the default category sets.
pub fn memory_ledger() -> LedgerManager {
    LedgerManager::new(Arc::new(MemoryStore::new()), CategoryCatalog::default())
}

/// Ledger over JSON files in a fresh temp dir; keep the guard alive.
pub fn disk_ledger() -> (LedgerManager, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let ledger = open_disk_ledger(&temp);
    (ledger, temp)
}

/// Another manager over the same directory, as a second process would see it.
pub fn open_disk_ledger(temp: &TempDir) -> LedgerManager {
    let store = JsonFileStore::new(temp.path().join("data")).expect("create json store");
    LedgerManager::new(Arc::new(store), CategoryCatalog::default())
}

pub fn draft(amount: f64, category: &str, date: &str) -> EntryDraft {
    EntryDraft::new(amount, category, date)
}

/// Adds `(amount, category, date)` rows to one collection, in order.
pub fn seed(ledger: &LedgerManager, kind: EntryKind, rows: &[(f64, &str, &str)]) {
    for (amount, category, date) in rows {
        ledger
            .add(kind, &draft(*amount, category, date))
            .expect("seed entry");
    }
}
