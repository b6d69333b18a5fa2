//! Pull one document's edit out of a fan-out operation.

use std::borrow::Cow;

use serde_json::Value;

use crate::matcher::fan_out_id;
use crate::path::Path;
use crate::wire::Operation;

/// Reshape `op` into an operation addressed at `path`.
///
/// A fan-out op yields `[...path, component]` from the entry whose id and
/// sub-path match `path` and whose component is a text edit, or `None` when
/// no entry qualifies. Every other shape is returned as is.
pub fn reconstruct<'a>(op: &'a Operation, path: &Path) -> Option<Cow<'a, Operation>> {
    let Operation::FanOut(fan) = op else {
        return Some(Cow::Borrowed(op));
    };
    let (index, id) = fan_out_id(path, &fan.key)?;
    let rest = &path[index + 2..];
    let entry = fan
        .entries
        .iter()
        .find(|entry| &entry.id == id && entry.path.keys() == rest && entry.is_text_edit())?;
    Some(Cow::Owned(Operation::Regular {
        path: path.clone(),
        component: entry.component.clone(),
    }))
}

/// [`reconstruct`] on raw wire values.
pub fn reconstruct_json(op: &Value, path: &Path) -> Option<Value> {
    let op = Operation::from_json(op)?;
    reconstruct(&op, path).map(|op| op.to_json())
}
