//! Decide whether a remote operation can touch a watched document path.
//!
//! Several sync controllers usually share one store, each watching its own
//! file. Every controller sees every op, so this check is what keeps an edit
//! to one file out of the other files' editors.

use serde_json::Value;

use crate::path::{Path, PathKey};
use crate::wire::Operation;

/// Position of `key` in `path` and the document id that follows it.
pub(crate) fn fan_out_id<'a>(path: &'a Path, key: &str) -> Option<(usize, &'a PathKey)> {
    let index = path.position_of(key)?;
    Some((index, path.get(index + 1)?))
}

pub fn can_affect(op: &Operation, path: &Path) -> bool {
    let affects = match op {
        Operation::Regular { path: op_path, .. } => op_path.overlaps(path),
        Operation::Move(mv) => mv.source_path().is_prefix_of(path),
        Operation::FanOut(fan) => fan_out_id(path, &fan.key).is_some_and(|(_, id)| {
            fan.entries.iter().any(|entry| &entry.id == id && entry.is_text_edit())
        }),
        Operation::Batch(parts) => return parts.iter().any(|part| can_affect(part, path)),
    };
    tracing::trace!(%path, affects, "path match");
    affects
}

/// [`can_affect`] on a raw wire value. Anything that does not parse as an
/// operation affects nothing.
pub fn can_affect_json(op: &Value, path: &Path) -> bool {
    Operation::from_json(op).is_some_and(|op| can_affect(&op, path))
}
