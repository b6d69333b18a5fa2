use std::cell::Cell;
use std::rc::Rc;

use ot_text_unicode::{TextAlgebra, TextUnicode};
use serde_json::Value;

use super::{DocumentStore, EditorSurface, EditorUpdate, ListenerId};
use crate::change::ChangeSet;
use crate::options::{OriginalDocument, SyncOptions};
use crate::path::Path;
use crate::sequential;
use crate::wire::Operation;

/// Reentrancy guard of a [`SyncController`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    /// A local edit is being submitted or a remote edit dispatched; callbacks
    /// arriving now are echoes of that work.
    Locked,
}

/// Holds [`SyncState::Locked`] until dropped.
struct Lock<'a> {
    state: &'a Cell<SyncState>,
}

impl<'a> Lock<'a> {
    fn acquire(state: &'a Cell<SyncState>) -> Option<Self> {
        if state.get() == SyncState::Locked {
            return None;
        }
        state.set(SyncState::Locked);
        Some(Self { state })
    }
}

impl Drop for Lock<'_> {
    fn drop(&mut self) {
        self.state.set(SyncState::Idle);
    }
}

#[derive(Debug, Clone, Copy)]
struct Subscriptions {
    op: ListenerId,
    update: ListenerId,
}

/// Keeps one editing surface and one string in a shared document in step.
///
/// Local updates are encoded and submitted; remote ops that reach the watched
/// path are decoded and dispatched. Whatever arrives while the controller is
/// busy with the other direction is dropped, so neither side sees its own
/// edits come back.
pub struct SyncController<S: EditorSurface, D: DocumentStore, A: TextAlgebra = TextUnicode> {
    surface: Rc<S>,
    store: Rc<D>,
    algebra: A,
    options: SyncOptions,
    state: Cell<SyncState>,
    subscriptions: Cell<Option<Subscriptions>>,
}

impl<S, D> SyncController<S, D>
where
    S: EditorSurface + 'static,
    D: DocumentStore + 'static,
{
    pub fn attach(surface: Rc<S>, store: Rc<D>, options: SyncOptions) -> Rc<Self> {
        Self::attach_with(TextUnicode, surface, store, options)
    }
}

impl<S, D, A> SyncController<S, D, A>
where
    S: EditorSurface + 'static,
    D: DocumentStore + 'static,
    A: TextAlgebra + 'static,
{
    /// Subscribe to both sides. The listeners hold weak references; dropping
    /// the returned controller unsubscribes.
    pub fn attach_with(algebra: A, surface: Rc<S>, store: Rc<D>, options: SyncOptions) -> Rc<Self> {
        let controller = Rc::new(Self {
            surface,
            store,
            algebra,
            options,
            state: Cell::new(SyncState::Idle),
            subscriptions: Cell::new(None),
        });

        let weak = Rc::downgrade(&controller);
        let op = controller.store.on_op(Rc::new(move |op: &Value| {
            if let Some(controller) = weak.upgrade() {
                controller.handle_remote_op(op);
            }
        }));
        let weak = Rc::downgrade(&controller);
        let update = controller.surface.on_update(Rc::new(move |update: &EditorUpdate| {
            if let Some(controller) = weak.upgrade() {
                controller.handle_local_update(update);
            }
        }));
        controller.subscriptions.set(Some(Subscriptions { op, update }));
        tracing::debug!(path = %controller.options.path, "sync attached");
        controller
    }
}

impl<S: EditorSurface, D: DocumentStore, A: TextAlgebra> SyncController<S, D, A> {
    pub fn state(&self) -> SyncState {
        self.state.get()
    }

    pub fn path(&self) -> &Path {
        &self.options.path
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn surface(&self) -> &Rc<S> {
        &self.surface
    }

    pub fn store(&self) -> &Rc<D> {
        &self.store
    }

    pub fn is_attached(&self) -> bool {
        self.subscriptions.get().is_some()
    }

    /// Editor to store.
    pub fn handle_local_update(&self, update: &EditorUpdate) {
        if !update.doc_changed() {
            return;
        }
        let Some(_lock) = Lock::acquire(&self.state) else {
            tracing::trace!(path = %self.options.path, "ignoring echoed editor update");
            return;
        };
        match sequential::encode_with(&self.algebra, &self.options.path, &update.changes, &update.start_doc) {
            Ok(Some(op)) => {
                let op = op.to_json();
                tracing::debug!(path = %self.options.path, %op, "submitting local edit");
                if let Err(err) = self.store.submit_op(op) {
                    tracing::debug!(path = %self.options.path, %err, "store rejected local edit");
                }
            }
            Ok(None) => {}
            Err(err) => tracing::debug!(path = %self.options.path, %err, "could not encode local edit"),
        }
    }

    /// Store to editor. All parts of a batch reach the surface as one update.
    pub fn handle_remote_op(&self, op: &Value) {
        let Some(_lock) = Lock::acquire(&self.state) else {
            tracing::trace!(path = %self.options.path, "ignoring echoed remote op");
            return;
        };
        let Some(parsed) = Operation::from_json_with(op, &self.options.fan_out_key) else {
            tracing::debug!(path = %self.options.path, %op, "skipping unrecognized remote op");
            return;
        };
        let original = match self.options.original_document {
            OriginalDocument::Editor => Some(self.surface.text()),
            OriginalDocument::Store => self
                .store
                .value_at(&self.options.path)
                .and_then(|v| v.as_str().map(str::to_owned)),
        };
        let changes = sequential::decode_with(&self.algebra, &parsed, &self.options.path, original.as_deref());
        if changes.is_empty() {
            return;
        }
        let changes = match ChangeSet::new(changes) {
            Ok(changes) => changes,
            Err(err) => {
                tracing::debug!(path = %self.options.path, %err, "remote op produced an invalid change set");
                return;
            }
        };
        tracing::debug!(path = %self.options.path, count = changes.len(), "applying remote changes");
        if let Err(err) = self.surface.dispatch(&changes) {
            tracing::debug!(path = %self.options.path, %err, "editor rejected remote changes");
        }
    }

    /// Unsubscribe from both sides. Idempotent.
    pub fn detach(&self) {
        if let Some(subs) = self.subscriptions.take() {
            self.store.off_op(subs.op);
            self.surface.off_update(subs.update);
            tracing::debug!(path = %self.options.path, "sync detached");
        }
    }
}

impl<S: EditorSurface, D: DocumentStore, A: TextAlgebra> Drop for SyncController<S, D, A> {
    fn drop(&mut self) {
        self.detach();
    }
}
