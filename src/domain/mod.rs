pub mod category;
pub mod common;
pub mod entry;

pub use category::CategoryCatalog;
pub use common::{Amounted, Displayable, Identifiable};
pub use entry::{
    EditRequest, Entry, EntryDraft, EntryField, EntryId, EntryKind, FieldIssue, ValidationError,
};
