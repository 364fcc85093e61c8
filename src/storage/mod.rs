//! Keyed blob storage and the typed collection layer built on top of it.

pub mod json_backend;
pub mod memory;

use std::{collections::HashSet, sync::Arc};

use serde_json::Value;
use uuid::Uuid;
use tracing::{debug, warn};

use crate::{
    core::errors::BudgetError,
    domain::{EditRequest, Entry, EntryKind},
    errors::StoreError,
};

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Store key holding the staged edit request.
pub const PENDING_EDIT_KEY: &str = "pendingEdit";

/// Abstraction over durable keyed blob storage.
///
/// Backends enforce no schema; payloads are opaque strings. A `write`
/// replaces the whole value for a key.
pub trait RecordStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, payload: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Typed access to the two entry collections and the pending edit slot.
///
/// Reads never fail: a missing, unreadable or corrupt collection reads as
/// empty. Writes report [`BudgetError::StorageUnavailable`] and are not retried.
#[derive(Clone)]
pub struct EntryStore {
    backend: Arc<dyn RecordStore>,
}

impl EntryStore {
    pub fn new(backend: Arc<dyn RecordStore>) -> Self {
        Self { backend }
    }

    /// Loads the collection for `kind` in stored order.
    pub fn get(&self, kind: EntryKind) -> Vec<Entry> {
        let payload = match self.backend.read(kind.storage_key()) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(%kind, error = %err, "collection read failed; treating as empty");
                return Vec::new();
            }
        };
        let decoded = decode_collection(kind, &payload);
        if decoded.backfilled_ids {
            debug!(%kind, "assigning identifiers to legacy entries");
            if let Err(err) = self.put(kind, &decoded.entries) {
                warn!(%kind, error = %err, "could not persist backfilled identifiers");
            }
        }
        decoded.entries
    }

    /// Replaces the whole collection for `kind`.
    pub fn put(&self, kind: EntryKind, entries: &[Entry]) -> std::result::Result<(), BudgetError> {
        let payload = serde_json::to_string(entries).map_err(StoreError::from)?;
        self.backend
            .write(kind.storage_key(), &payload)
            .map_err(|err| {
                warn!(%kind, error = %err, "collection write dropped");
                BudgetError::from(err)
            })
    }

    /// Removes the collection for `kind`.
    pub fn clear(&self, kind: EntryKind) -> std::result::Result<(), BudgetError> {
        self.backend.remove(kind.storage_key()).map_err(|err| {
            warn!(%kind, error = %err, "collection clear dropped");
            BudgetError::from(err)
        })
    }

    /// Returns the staged edit request, if one is stored and readable.
    pub fn pending_edit(&self) -> Option<EditRequest> {
        let payload = match self.backend.read(PENDING_EDIT_KEY) {
            Ok(payload) => payload?,
            Err(err) => {
                warn!(error = %err, "pending edit read failed");
                return None;
            }
        };
        match serde_json::from_str(&payload) {
            Ok(request) => Some(request),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable pending edit");
                None
            }
        }
    }

    pub fn set_pending_edit(&self, request: &EditRequest) -> std::result::Result<(), BudgetError> {
        let payload = serde_json::to_string(request).map_err(StoreError::from)?;
        self.backend
            .write(PENDING_EDIT_KEY, &payload)
            .map_err(BudgetError::from)
    }

    pub fn clear_pending_edit(&self) -> std::result::Result<(), BudgetError> {
        self.backend
            .remove(PENDING_EDIT_KEY)
            .map_err(BudgetError::from)
    }
}

struct DecodedCollection {
    entries: Vec<Entry>,
    backfilled_ids: bool,
}

fn decode_collection(kind: EntryKind, payload: &str) -> DecodedCollection {
    let mut decoded = DecodedCollection {
        entries: Vec::new(),
        backfilled_ids: false,
    };
    let items = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Array(items)) => items,
        Ok(Value::Null) => return decoded,
        Ok(_) => {
            warn!(%kind, "collection payload is not a list; treating as empty");
            return decoded;
        }
        Err(err) => {
            warn!(%kind, error = %err, "collection payload unparsable; treating as empty");
            return decoded;
        }
    };

    // A repeated id is treated like a missing one so every slot stays addressable.
    let mut seen = HashSet::new();
    for (position, mut item) in items.into_iter().enumerate() {
        let Some(object) = item.as_object_mut() else {
            warn!(%kind, position, "skipping non-object entry");
            continue;
        };
        let stored_id = object
            .get("id")
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok());
        let keep_id = stored_id.is_some_and(|id| !seen.contains(&id));
        if !keep_id {
            if let Some(id) = stored_id {
                warn!(%kind, position, %id, "duplicate entry id; assigning a fresh one");
            }
            object.remove("id");
        }
        match serde_json::from_value::<Entry>(item) {
            Ok(entry) => {
                decoded.backfilled_ids |= !keep_id;
                seen.insert(entry.id);
                decoded.entries.push(entry);
            }
            Err(err) => warn!(%kind, position, error = %err, "skipping unreadable entry"),
        }
    }
    decoded
}
