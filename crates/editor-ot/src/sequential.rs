//! json1 + text-unicode codec.
//!
//! Encoding turns each change into elementary text-unicode ops addressed in
//! code points, folds them with the algebra's `compose` and wraps the result
//! as `[...path, {es: op}]`. Decoding walks the `es` list with a code point
//! cursor over the original document and converts every cursor position back
//! to UTF-16 with the same rule.

use ot_text_unicode::{TextAlgebra, TextComponent, TextOp, TextUnicode};
use serde_json::Value;

use crate::change::{Change, ChangeSet};
use crate::edit::{get_at_path, EditOp};
use crate::matcher::can_affect;
use crate::path::Path;
use crate::position::{code_point_len, code_point_to_utf16, utf16_to_code_point, Utf16Doc};
use crate::reconstruct::reconstruct;
use crate::wire::{Component, EditElement, Operation};
use crate::CodecError;

/// Encode with the stock text-unicode algebra.
pub fn encode(path: &Path, changes: &ChangeSet, doc: &str) -> Result<Option<EditOp>, CodecError> {
    encode_with(&TextUnicode, path, changes, doc)
}

/// Encode `changes` against the pre-edit document `doc`.
///
/// Returns `Ok(None)` when no change produces an elementary op; callers should
/// skip submission in that case.
pub fn encode_with<A: TextAlgebra>(
    algebra: &A,
    path: &Path,
    changes: &ChangeSet,
    doc: &str,
) -> Result<Option<EditOp>, CodecError> {
    let units = Utf16Doc::new(doc);
    let mut ops = Vec::new();
    let mut inserted = 0;
    let mut deleted = 0;
    for change in changes {
        let at = utf16_to_code_point(doc, change.from) + inserted - deleted;
        if change.from != change.to {
            let text = units.slice(change.from, change.to)?;
            deleted += code_point_len(&text);
            ops.push(algebra.remove(at, &text));
        }
        if !change.insert.is_empty() {
            inserted += code_point_len(&change.insert);
            ops.push(algebra.insert(at, &change.insert));
        }
    }
    let Some(op) = ops.into_iter().reduce(|acc, next| algebra.compose(&acc, &next)) else {
        return Ok(None);
    };
    Ok(Some(EditOp::new(path.clone(), algebra.normalize(op))))
}

/// Decode with the stock text-unicode algebra.
pub fn decode(op: &Operation, target: &Path, original: Option<&str>) -> Vec<Change> {
    decode_with(&TextUnicode, op, target, original)
}

/// Changes that `op` makes to the document at `target`.
///
/// `original` is the document the op's positions refer to. Without it, code
/// points are taken to be UTF-16 units. Parts of the op that do not reach
/// `target` contribute nothing. The parts of a batch apply one after another,
/// so their text ops are composed and the result is decoded once against
/// `original`.
pub fn decode_with<A: TextAlgebra>(
    algebra: &A,
    op: &Operation,
    target: &Path,
    original: Option<&str>,
) -> Vec<Change> {
    let mut parts = Vec::new();
    flatten(op, &mut parts);
    let mut len = original.map_or(0, code_point_len);
    let mut composed: Option<TextOp> = None;
    for part in parts {
        let Some(text_op) = text_op_for(algebra, part, target, len) else {
            continue;
        };
        len = len_after(len, &text_op);
        composed = Some(match composed {
            Some(acc) => algebra.compose(&acc, &text_op),
            None => text_op,
        });
    }
    let Some(op) = composed else {
        return Vec::new();
    };
    decode_text_op(&op, original)
        .into_iter()
        .filter(|change| !change.is_empty())
        .collect()
}

/// [`decode`] on a raw wire value.
pub fn decode_json(op: &Value, target: &Path, original: Option<&str>) -> Vec<Change> {
    match Operation::from_json(op) {
        Some(op) => decode(&op, target, original),
        None => Vec::new(),
    }
}

fn flatten<'a>(op: &'a Operation, out: &mut Vec<&'a Operation>) {
    for part in op.parts() {
        match part {
            Operation::Batch(_) => flatten(part, out),
            _ => out.push(part),
        }
    }
}

/// The text op one part applies to the document at `target`, given the
/// document's current length in code points.
fn text_op_for<A: TextAlgebra>(algebra: &A, part: &Operation, target: &Path, len: usize) -> Option<TextOp> {
    let Some(op) = reconstruct(part, target) else {
        tracing::trace!(%target, "no fan-out entry for path");
        return None;
    };
    if !can_affect(&op, target) {
        return None;
    }
    let whole = |text: &str| algebra.compose(&algebra.remove_count(0, len), &algebra.insert(0, text));
    match &*op {
        Operation::Move(_) => Some(whole("")),
        Operation::Regular { path, component } if path == target => match component {
            Component::Edit(elements) => Some(known_components(elements)),
            Component::Replace { new, .. } => Some(whole(new.as_str().unwrap_or_default())),
            Component::Remove { .. } | Component::Pick(_) => Some(whole("")),
            Component::Insert(_) | Component::Other(_) => None,
        },
        Operation::Regular { path, component } if path.is_prefix_of(target) => {
            // The watched document sits inside a value replaced or removed wholesale.
            let rest = &target[path.len()..];
            match component {
                Component::Replace { new, .. } => {
                    Some(whole(get_at_path(new, rest).and_then(Value::as_str).unwrap_or_default()))
                }
                Component::Remove { .. } | Component::Pick(_) => Some(whole("")),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Document length in code points once `op` has been applied.
fn len_after(len: usize, op: &[TextComponent]) -> usize {
    let (inserted, deleted) = op.iter().fold((0, 0), |(ins, del), c| match c {
        TextComponent::Insert(_) => (ins + c.dst_len(), del),
        TextComponent::Delete(_) | TextComponent::DeleteStr(_) => (ins, del + c.src_len()),
        TextComponent::Retain(_) => (ins, del),
    });
    (len + inserted).saturating_sub(deleted)
}

fn known_components(elements: &[EditElement]) -> TextOp {
    elements
        .iter()
        .filter_map(|element| {
            let known = element.as_known();
            if known.is_none() {
                tracing::trace!(?element, "skipping unrecognized edit element");
            }
            known.cloned()
        })
        .collect()
}

fn decode_text_op(op: &[TextComponent], original: Option<&str>) -> Vec<Change> {
    let to_utf16 = |cp: usize| original.map_or(cp, |doc| code_point_to_utf16(doc, cp));
    let mut changes = Vec::new();
    let mut cursor = 0;
    let mut iter = op.iter().peekable();
    while let Some(component) = iter.next() {
        match component {
            TextComponent::Retain(n) => cursor += n,
            TextComponent::Insert(text) => {
                let next_delete = iter.peek().filter(|next| next.is_delete()).map(|next| next.src_len());
                if next_delete.is_some() {
                    iter.next();
                }
                let deleted = next_delete.unwrap_or(0);
                changes.push(Change::replace(to_utf16(cursor), to_utf16(cursor + deleted), text.clone()));
                cursor += deleted;
            }
            TextComponent::Delete(_) | TextComponent::DeleteStr(_) => {
                let n = component.src_len();
                changes.push(Change::delete(to_utf16(cursor), to_utf16(cursor + n)));
                cursor += n;
            }
        }
    }
    changes
}
