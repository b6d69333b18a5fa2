//! Wiring between an editing surface and a shared document store.
//!
//! Both collaborators are traits so hosts can bind real editors and real OT
//! backends. [`memory`] has in-process implementations of both.

use std::rc::Rc;

use serde_json::Value;

use crate::change::ChangeSet;
use crate::path::Path;
use crate::CodecError;

pub mod controller;
pub mod memory;

pub use controller::{SyncController, SyncState};
pub use memory::{MemoryStore, MemorySurface};

pub type ListenerId = u64;
pub type OpListener = Rc<dyn Fn(&Value)>;
pub type UpdateListener = Rc<dyn Fn(&EditorUpdate)>;

/// One transaction applied to an editing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorUpdate {
    pub changes: ChangeSet,
    /// The document before `changes` were applied.
    pub start_doc: String,
}

impl EditorUpdate {
    pub fn doc_changed(&self) -> bool {
        !self.changes.is_noop()
    }
}

/// A text editor addressed in UTF-16 offsets.
pub trait EditorSurface {
    fn text(&self) -> String;

    /// Apply `changes` as one atomic update. Update listeners run before this
    /// returns.
    fn dispatch(&self, changes: &ChangeSet) -> Result<(), CodecError>;

    fn on_update(&self, listener: UpdateListener) -> ListenerId;

    fn off_update(&self, id: ListenerId) -> bool;
}

/// A shared JSON document that accepts and broadcasts json1 operations.
pub trait DocumentStore {
    fn value_at(&self, path: &Path) -> Option<Value>;

    fn submit_op(&self, op: Value) -> Result<(), CodecError>;

    fn on_op(&self, listener: OpListener) -> ListenerId;

    fn off_op(&self, id: ListenerId) -> bool;
}
