#![doc(test(attr(deny(warnings))))]

//! Smart Budget keeps two ledgers, expenses and incomes, in a keyed record
//! store and answers filtered, sorted and aggregated queries over them.
//!
//! [`core::ledger_manager::LedgerManager`] is the entry point for embedding;
//! the `smart_budget_cli` binary wraps it in a command shell.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Smart Budget tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
