//! In-process collaborators for hosts without a real editor or backend.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use super::{DocumentStore, EditorSurface, EditorUpdate, ListenerId, OpListener, UpdateListener};
use crate::change::{Change, ChangeSet};
use crate::constants::FAN_OUT_KEY;
use crate::edit::{apply_edit, get_at_path};
use crate::path::Path;
use crate::wire::Operation;
use crate::CodecError;

/// Listener table with monotonically increasing ids.
struct Listeners<F: ?Sized> {
    next_id: Cell<ListenerId>,
    entries: RefCell<BTreeMap<ListenerId, Rc<F>>>,
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self { next_id: Cell::new(1), entries: RefCell::new(BTreeMap::new()) }
    }
}

impl<F: ?Sized> Listeners<F> {
    fn add(&self, listener: Rc<F>) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id.saturating_add(1));
        self.entries.borrow_mut().insert(id, listener);
        id
    }

    fn remove(&self, id: ListenerId) -> bool {
        self.entries.borrow_mut().remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Listeners may subscribe or unsubscribe while being notified.
    fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries.borrow().values().cloned().collect()
    }
}

// ── Store ───────────────────────────────────────────────────────────────

/// A JSON document that applies json1 operations and notifies listeners
/// synchronously, local submissions included.
pub struct MemoryStore {
    data: RefCell<Value>,
    fan_out_key: String,
    listeners: Listeners<dyn Fn(&Value)>,
    submitted: RefCell<Vec<Value>>,
}

impl MemoryStore {
    pub fn new(data: Value) -> Self {
        Self {
            data: RefCell::new(data),
            fan_out_key: FAN_OUT_KEY.to_string(),
            listeners: Listeners::default(),
            submitted: RefCell::new(Vec::new()),
        }
    }

    pub fn with_fan_out_key(mut self, key: impl Into<String>) -> Self {
        self.fan_out_key = key.into();
        self
    }

    /// An op from another client: apply it, then notify listeners.
    pub fn receive(&self, op: &Value) -> Result<(), CodecError> {
        self.apply(op)?;
        self.emit(op);
        Ok(())
    }

    /// Notify listeners without touching the data.
    pub fn broadcast(&self, op: &Value) {
        self.emit(op);
    }

    pub fn data(&self) -> Value {
        self.data.borrow().clone()
    }

    /// Ops passed to [`DocumentStore::submit_op`], oldest first.
    pub fn submitted(&self) -> Vec<Value> {
        self.submitted.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn apply(&self, op: &Value) -> Result<(), CodecError> {
        let parsed = Operation::from_json_with(op, &self.fan_out_key)
            .ok_or_else(|| CodecError::InvalidComponent(op.to_string()))?;
        // A failing part must leave no partial writes.
        let mut next = self.data.borrow().clone();
        apply_edit(&mut next, &parsed)?;
        *self.data.borrow_mut() = next;
        Ok(())
    }

    fn emit(&self, op: &Value) {
        for listener in self.listeners.snapshot() {
            listener(op);
        }
    }
}

impl DocumentStore for MemoryStore {
    fn value_at(&self, path: &Path) -> Option<Value> {
        get_at_path(&self.data.borrow(), path).cloned()
    }

    fn submit_op(&self, op: Value) -> Result<(), CodecError> {
        self.apply(&op)?;
        self.submitted.borrow_mut().push(op.clone());
        self.emit(&op);
        Ok(())
    }

    fn on_op(&self, listener: OpListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn off_op(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

// ── Surface ─────────────────────────────────────────────────────────────

/// A plain text buffer standing in for an editor view.
pub struct MemorySurface {
    text: RefCell<String>,
    listeners: Listeners<dyn Fn(&EditorUpdate)>,
    history: RefCell<Vec<EditorUpdate>>,
}

impl MemorySurface {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(text.into()),
            listeners: Listeners::default(),
            history: RefCell::new(Vec::new()),
        }
    }

    /// A user edit.
    pub fn edit(&self, changes: Vec<Change>) -> Result<(), CodecError> {
        self.dispatch(&ChangeSet::new(changes)?)
    }

    /// Every update applied so far, local and remote.
    pub fn history(&self) -> Vec<EditorUpdate> {
        self.history.borrow().clone()
    }

    pub fn last_changes(&self) -> Option<ChangeSet> {
        self.history.borrow().last().map(|update| update.changes.clone())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl EditorSurface for MemorySurface {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn dispatch(&self, changes: &ChangeSet) -> Result<(), CodecError> {
        let start_doc = self.text();
        let next = changes.apply(&start_doc)?;
        *self.text.borrow_mut() = next;
        let update = EditorUpdate { changes: changes.clone(), start_doc };
        self.history.borrow_mut().push(update.clone());
        for listener in self.listeners.snapshot() {
            listener(&update);
        }
        Ok(())
    }

    fn on_update(&self, listener: UpdateListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn off_update(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}
