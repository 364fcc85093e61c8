use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::errors::BudgetError;
use crate::core::services::{
    CategoryAggregate, EntryService, ExportRows, ExportService, FilterSpec, LedgerRow,
    QueryService, Report, ServiceResult, SortOrder, SummaryService, Totals,
};
use crate::domain::{CategoryCatalog, EditRequest, Entry, EntryDraft, EntryId, EntryKind};
use crate::storage::{EntryStore, RecordStore};

/// What a submit did with the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(EntryId),
    Updated(EntryId),
}

impl SubmitOutcome {
    pub fn id(self) -> EntryId {
        match self {
            SubmitOutcome::Added(id) | SubmitOutcome::Updated(id) => id,
        }
    }
}

/// Facade over the entry store: CRUD, edit handoff, queries and exports.
///
/// Holds no cached collection. Every call reloads what it needs from the
/// store, so indices are always resolved against the current contents.
pub struct LedgerManager {
    store: EntryStore,
    catalog: CategoryCatalog,
}

impl LedgerManager {
    pub fn new(backend: Arc<dyn RecordStore>, catalog: CategoryCatalog) -> Self {
        Self {
            store: EntryStore::new(backend),
            catalog,
        }
    }

    /// Current collection for `kind`, in insertion order.
    pub fn entries(&self, kind: EntryKind) -> Vec<Entry> {
        self.store.get(kind)
    }

    pub fn merged_view(&self) -> Vec<LedgerRow> {
        QueryService::merged_view(
            self.store.get(EntryKind::Expense),
            self.store.get(EntryKind::Income),
        )
    }

    /// Validates and appends a new entry. Returns its identifier.
    pub fn add(&self, kind: EntryKind, draft: &EntryDraft) -> ServiceResult<EntryId> {
        let entry = draft.validate(kind, &self.catalog)?;
        let id = entry.id;
        let mut entries = self.store.get(kind);
        let index = EntryService::append(&mut entries, entry);
        self.store.put(kind, &entries)?;
        info!(%kind, index, %id, "entry added");
        Ok(id)
    }

    /// Replaces the entry at `index` of the current collection.
    pub fn edit(
        &self,
        kind: EntryKind,
        index: usize,
        draft: &EntryDraft,
    ) -> ServiceResult<EntryId> {
        let mut entries = self.store.get(kind);
        EntryService::check_index(kind, &entries, index)?;
        let replacement = draft.validate(kind, &self.catalog)?;
        EntryService::replace_at(kind, &mut entries, index, replacement)?;
        let id = entries[index].id;
        self.store.put(kind, &entries)?;
        info!(%kind, index, %id, "entry updated");
        Ok(id)
    }

    /// Removes the entry at `index`; later entries shift down by one.
    pub fn delete(&self, kind: EntryKind, index: usize) -> ServiceResult<Entry> {
        let mut entries = self.store.get(kind);
        let removed = EntryService::remove_at(kind, &mut entries, index)?;
        self.store.put(kind, &entries)?;
        info!(%kind, index, id = %removed.id, "entry deleted");
        Ok(removed)
    }

    pub fn edit_by_id(
        &self,
        kind: EntryKind,
        id: EntryId,
        draft: &EntryDraft,
    ) -> ServiceResult<EntryId> {
        let entries = self.store.get(kind);
        let index = EntryService::position_of(kind, &entries, id)?;
        self.edit(kind, index, draft)
    }

    pub fn delete_by_id(&self, kind: EntryKind, id: EntryId) -> ServiceResult<Entry> {
        let entries = self.store.get(kind);
        let index = EntryService::position_of(kind, &entries, id)?;
        self.delete(kind, index)
    }

    /// Wipes both collections and any staged edit.
    pub fn clear_all(&self) -> ServiceResult<()> {
        for kind in EntryKind::ALL {
            self.store.clear(kind)?;
        }
        self.store.clear_pending_edit()?;
        info!("all entries cleared");
        Ok(())
    }

    /// Marks the entry at `index` for replacement by the next [`submit`](Self::submit).
    pub fn stage_edit(&self, kind: EntryKind, index: usize) -> ServiceResult<EditRequest> {
        let entries = self.store.get(kind);
        EntryService::check_index(kind, &entries, index)?;
        let request = EditRequest {
            kind,
            id: entries[index].id,
        };
        self.store.set_pending_edit(&request)?;
        info!(%kind, index, id = %request.id, "edit staged");
        Ok(request)
    }

    pub fn pending_edit(&self) -> Option<EditRequest> {
        self.store.pending_edit()
    }

    /// Drops the staged edit. Returns whether one was staged.
    pub fn cancel_edit(&self) -> ServiceResult<bool> {
        let staged = self.store.pending_edit().is_some();
        self.store.clear_pending_edit()?;
        if staged {
            info!("staged edit cancelled");
        }
        Ok(staged)
    }

    /// Applies a form submit: replaces the staged target, or appends when
    /// nothing is staged.
    ///
    /// A staged edit for the other collection is rejected and stays staged. A
    /// staged edit whose target is gone is cleared and nothing is written.
    pub fn submit(&self, kind: EntryKind, draft: &EntryDraft) -> ServiceResult<SubmitOutcome> {
        let Some(request) = self.store.pending_edit() else {
            return self.add(kind, draft).map(SubmitOutcome::Added);
        };
        if request.kind != kind {
            return Err(BudgetError::EditKindMismatch {
                pending: request.kind,
                submitted: kind,
            });
        }
        let replacement = draft.validate(kind, &self.catalog)?;

        let mut entries = self.store.get(kind);
        let index = match EntryService::position_of(kind, &entries, request.id) {
            Ok(index) => index,
            Err(err) => {
                warn!(%kind, id = %request.id, "staged edit target is gone; discarding");
                self.store.clear_pending_edit()?;
                return Err(err);
            }
        };
        EntryService::replace_at(kind, &mut entries, index, replacement)?;
        self.store.put(kind, &entries)?;
        self.store.clear_pending_edit()?;
        info!(%kind, index, id = %request.id, "staged edit applied");
        Ok(SubmitOutcome::Updated(request.id))
    }

    /// Runs the query pipeline over a fresh merged view.
    pub fn list(&self, spec: &FilterSpec, order: SortOrder) -> Vec<LedgerRow> {
        QueryService::run(self.merged_view(), spec, order)
    }

    /// Newest entries of both collections; undated entries come last.
    pub fn recent(&self, limit: Option<usize>) -> Vec<LedgerRow> {
        let mut rows = self.list(&FilterSpec::all(), SortOrder::DateDesc);
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        rows
    }

    /// Global totals without a spec, filtered totals with one.
    pub fn totals(&self, spec: Option<&FilterSpec>) -> Totals {
        match spec {
            None => SummaryService::global_totals(
                &self.store.get(EntryKind::Expense),
                &self.store.get(EntryKind::Income),
            ),
            Some(spec) => {
                SummaryService::filtered_totals(&QueryService::filter(self.merged_view(), spec))
            }
        }
    }

    pub fn category_aggregates(&self, spec: &FilterSpec) -> Vec<CategoryAggregate> {
        SummaryService::category_aggregates(&QueryService::filter(self.merged_view(), spec))
    }

    pub fn report(&self, spec: &FilterSpec) -> Report {
        let rows = QueryService::filter(self.merged_view(), spec);
        debug!(rows = rows.len(), month = ?spec.month, "building report");
        SummaryService::report(&rows, spec.month.clone())
    }

    /// Every entry of both collections, unfiltered, in merged-view order.
    pub fn export_history_csv(&self) -> String {
        ExportService::to_csv(ExportRows::History(&self.merged_view()))
    }

    pub fn export_report_csv(&self, spec: &FilterSpec) -> String {
        let aggregates = self.category_aggregates(spec);
        ExportService::to_csv(ExportRows::Report(&aggregates))
    }
}
