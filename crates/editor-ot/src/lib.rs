//! Translate editor change sets into OT operations and back.
//!
//! Editors describe edits as [`ChangeSet`]s: non-overlapping replacements in
//! UTF-16 offsets of the pre-edit document. Shared-document backends speak
//! one of two operation formats:
//!
//! - json0 string ops ([`flat`]): `{p: [...path, offset], si | sd}` components
//! - json1 with embedded text-unicode edits ([`sequential`]):
//!   `[...path, {es: [retain, "insert", {d: delete}]}]`, addressed in Unicode
//!   code points
//!
//! [`can_affect`] and [`reconstruct`] route remote json1 ops (including
//! `["files", [id, ...], ...]` fan-out batches) to the document they touch,
//! and [`SyncController`] ties an editor and a store together without
//! echoing edits back to their origin.
//!
//! ```
//! use editor_ot::{sequential, Change, ChangeSet, Path};
//!
//! let changes = ChangeSet::new(vec![Change::replace(5, 6, "-")]).unwrap();
//! let op = sequential::encode(&Path::new(["title"]), &changes, "Hello World")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(op.to_json(), serde_json::json!(["title", {"es": [5, "-", {"d": " "}]}]));
//!
//! let decoded = sequential::decode(&op.to_operation(), &Path::new(["title"]), Some("Hello World"));
//! assert_eq!(decoded, changes.into_vec());
//! ```

pub mod change;
pub mod constants;
pub mod edit;
pub mod error;
pub mod flat;
pub mod matcher;
pub mod options;
pub mod path;
pub mod position;
pub mod reconstruct;
pub mod sequential;
pub mod sync;
pub mod wire;

pub use change::{Change, ChangeSet};
pub use edit::{apply_edit, edit_op, EditOp};
pub use error::{CodecError, OptionsError};
pub use flat::{FlatComponent, FlatEdit, FlatOp};
pub use matcher::{can_affect, can_affect_json};
pub use options::{OriginalDocument, SyncOptions};
pub use path::{Path, PathKey};
pub use position::{code_point_to_utf16, utf16_to_code_point};
pub use reconstruct::{reconstruct, reconstruct_json};
pub use sync::{DocumentStore, EditorSurface, EditorUpdate, MemoryStore, MemorySurface, SyncController, SyncState};
pub use wire::{Component, EditElement, FanOutEntry, FanOutOp, MoveOp, Operation};

pub use ot_text_unicode::{TextAlgebra, TextUnicode};
