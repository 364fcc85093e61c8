//! Positional and identifier addressing over a single collection.
//!
//! Indices are resolved against the slice handed in, never remembered, so a
//! caller must reload the collection before each call.

use crate::core::errors::BudgetError;
use crate::core::services::ServiceResult;
use crate::domain::{Entry, EntryId, EntryKind, Identifiable};

/// Provides bounds-checked CRUD helpers for one entry collection.
pub struct EntryService;

impl EntryService {
    /// Appends `entry` and returns the index it landed at.
    pub fn append(entries: &mut Vec<Entry>, entry: Entry) -> usize {
        entries.push(entry);
        entries.len() - 1
    }

    /// Fails with [`BudgetError::IndexOutOfRange`] unless `index < entries.len()`.
    pub fn check_index(kind: EntryKind, entries: &[Entry], index: usize) -> ServiceResult<()> {
        if index < entries.len() {
            Ok(())
        } else {
            Err(BudgetError::IndexOutOfRange {
                kind,
                index,
                len: entries.len(),
            })
        }
    }

    /// Replaces the whole record at `index`, keeping the slot's identifier.
    /// Returns the previous record.
    pub fn replace_at(
        kind: EntryKind,
        entries: &mut [Entry],
        index: usize,
        mut replacement: Entry,
    ) -> ServiceResult<Entry> {
        Self::check_index(kind, entries, index)?;
        replacement.id = entries[index].id;
        Ok(std::mem::replace(&mut entries[index], replacement))
    }

    /// Removes the record at `index`; later records shift down by one.
    pub fn remove_at(
        kind: EntryKind,
        entries: &mut Vec<Entry>,
        index: usize,
    ) -> ServiceResult<Entry> {
        Self::check_index(kind, entries, index)?;
        Ok(entries.remove(index))
    }

    /// Resolves a stable identifier to its current index.
    pub fn position_of(kind: EntryKind, entries: &[Entry], id: EntryId) -> ServiceResult<usize> {
        entries
            .iter()
            .position(|entry| entry.id() == id)
            .ok_or(BudgetError::EntryNotFound { kind, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(amount: f64) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            amount,
            category: "Food".into(),
            note: None,
            date: "2024-05-01".into(),
        }
    }

    #[test]
    fn append_returns_last_index() {
        let mut entries = vec![entry(1.0)];
        assert_eq!(EntryService::append(&mut entries, entry(2.0)), 1);
        assert_eq!(entries[1].amount, 2.0);
    }

    #[test]
    fn replace_keeps_slot_identifier() {
        let mut entries = vec![entry(1.0), entry(2.0)];
        let slot_id = entries[1].id;
        let previous = EntryService::replace_at(EntryKind::Expense, &mut entries, 1, entry(9.0))
            .expect("replace in range");
        assert_eq!(previous.amount, 2.0);
        assert_eq!(entries[1].amount, 9.0);
        assert_eq!(entries[1].id, slot_id);
    }

    #[test]
    fn out_of_range_index_is_rejected_without_mutation() {
        let mut entries = vec![entry(1.0)];
        let err = EntryService::remove_at(EntryKind::Income, &mut entries, 1)
            .expect_err("index past the end");
        assert!(matches!(
            err,
            BudgetError::IndexOutOfRange {
                kind: EntryKind::Income,
                index: 1,
                len: 1
            }
        ));
        assert_eq!(entries.len(), 1);

        let err = EntryService::replace_at(EntryKind::Income, &mut entries, 5, entry(2.0))
            .expect_err("index past the end");
        assert!(matches!(err, BudgetError::IndexOutOfRange { .. }));
        assert_eq!(entries[0].amount, 1.0);
    }

    #[test]
    fn remove_shifts_following_entries_down() {
        let mut entries = vec![entry(1.0), entry(2.0), entry(3.0)];
        let removed =
            EntryService::remove_at(EntryKind::Expense, &mut entries, 0).expect("remove first");
        assert_eq!(removed.amount, 1.0);
        assert_eq!(entries[0].amount, 2.0);
        assert_eq!(entries[1].amount, 3.0);
    }

    #[test]
    fn position_of_tracks_identity_across_removals() {
        let mut entries = vec![entry(1.0), entry(2.0), entry(3.0)];
        let target = entries[2].id;
        EntryService::remove_at(EntryKind::Expense, &mut entries, 0).expect("remove");
        assert_eq!(
            EntryService::position_of(EntryKind::Expense, &entries, target).expect("found"),
            1
        );
        let missing = Uuid::new_v4();
        assert!(matches!(
            EntryService::position_of(EntryKind::Expense, &entries, missing),
            Err(BudgetError::EntryNotFound { id, .. }) if id == missing
        ));
    }
}
