mod common;

use common::{draft, memory_ledger, seed};
use smart_budget::core::{
    errors::BudgetError,
    ledger_manager::SubmitOutcome,
    services::{FilterSpec, Month, SortOrder, Totals},
};
use smart_budget::domain::{EntryField, EntryKind};

#[test]
fn monthly_scenario_from_first_entry_to_delete() {
    let ledger = memory_ledger();
    ledger
        .add(EntryKind::Expense, &draft(100.0, "Food", "2024-05-01"))
        .expect("add expense");
    ledger
        .add(EntryKind::Income, &draft(500.0, "Salary", "2024-05-02"))
        .expect("add income");

    let totals = ledger.totals(None);
    assert_eq!(totals, Totals::new(500.0, 100.0));
    assert_eq!(totals.balance, 400.0);

    let may: Month = "2024-05".parse().expect("month");
    let listed = ledger.list(&FilterSpec::all().with_month(may), SortOrder::DateDesc);
    let kinds: Vec<_> = listed.iter().map(|row| row.kind).collect();
    assert_eq!(kinds, vec![EntryKind::Income, EntryKind::Expense]);

    ledger.delete(EntryKind::Expense, 0).expect("delete");
    assert!(ledger.entries(EntryKind::Expense).is_empty());
    assert_eq!(ledger.totals(None), Totals::new(500.0, 0.0));
}

#[test]
fn added_entry_lands_last_in_its_collection() {
    let ledger = memory_ledger();
    seed(
        &ledger,
        EntryKind::Expense,
        &[(3.0, "Food", "2024-01-03"), (1.0, "Health", "2024-01-01")],
    );
    let id = ledger
        .add(EntryKind::Expense, &draft(2.0, "Transport", "2023-12-31"))
        .expect("add");

    let listed = ledger.list(
        &FilterSpec::all().with_kind(EntryKind::Expense),
        SortOrder::DateDesc,
    );
    assert_eq!(listed.len(), 3);
    let entries = ledger.entries(EntryKind::Expense);
    let last = entries.last().expect("non-empty");
    assert_eq!(last.id, id);
    assert_eq!(last.category, "Transport");
}

#[test]
fn second_delete_past_the_end_changes_nothing() {
    let ledger = memory_ledger();
    seed(&ledger, EntryKind::Income, &[(10.0, "Gift", "2024-02-01")]);

    ledger.delete(EntryKind::Income, 0).expect("first delete");
    let err = ledger.delete(EntryKind::Income, 0).expect_err("nothing left");
    assert!(matches!(
        err,
        BudgetError::IndexOutOfRange {
            kind: EntryKind::Income,
            index: 0,
            len: 0
        }
    ));
    assert!(ledger.entries(EntryKind::Income).is_empty());
}

#[test]
fn every_failing_field_is_reported_together() {
    let ledger = memory_ledger();
    let err = ledger
        .add(EntryKind::Income, &draft(0.0, "  ", ""))
        .expect_err("invalid draft");
    let BudgetError::Validation(validation) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(validation.issues.len(), 3);
    assert!(validation.has_issue(EntryField::Amount));
    assert_eq!(
        validation.to_string(),
        "Please enter a valid amount. Please select a category. Please select a date."
    );
}

#[test]
fn categories_are_checked_against_the_kind() {
    let ledger = memory_ledger();
    let err = ledger
        .add(EntryKind::Income, &draft(10.0, "Food", "2024-02-01"))
        .expect_err("food is an expense category");
    assert!(matches!(err, BudgetError::Validation(ref v) if v.has_issue(EntryField::Category)));
}

#[test]
fn edit_handoff_replaces_in_place_after_reordering() {
    let ledger = memory_ledger();
    seed(
        &ledger,
        EntryKind::Expense,
        &[
            (1.0, "Food", "2024-03-01"),
            (2.0, "Food", "2024-03-02"),
            (3.0, "Food", "2024-03-03"),
        ],
    );
    let staged = ledger.stage_edit(EntryKind::Expense, 2).expect("stage");

    // The staged target moves from index 2 to 1.
    ledger.delete(EntryKind::Expense, 0).expect("delete");

    let outcome = ledger
        .submit(
            EntryKind::Expense,
            &draft(30.0, "Housing", "2024-03-03").with_note("rent top-up"),
        )
        .expect("submit");
    assert_eq!(outcome, SubmitOutcome::Updated(staged.id));

    let entries = ledger.entries(EntryKind::Expense);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].id, staged.id);
    assert_eq!(entries[1].amount, 30.0);
    assert_eq!(entries[1].note.as_deref(), Some("rent top-up"));
    assert!(ledger.pending_edit().is_none());
}

#[test]
fn rejected_submit_keeps_the_staged_edit() {
    let ledger = memory_ledger();
    seed(&ledger, EntryKind::Expense, &[(1.0, "Food", "2024-03-01")]);
    ledger.stage_edit(EntryKind::Expense, 0).expect("stage");

    ledger
        .submit(EntryKind::Expense, &draft(-1.0, "Food", "2024-03-01"))
        .expect_err("invalid amount");
    assert!(ledger.pending_edit().is_some());
    assert_eq!(ledger.entries(EntryKind::Expense)[0].amount, 1.0);
}
