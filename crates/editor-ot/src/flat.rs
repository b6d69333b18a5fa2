//! json0 string ops: a flat list of `{p: [...path, offset], si | sd}`.
//!
//! Each component's offset is a UTF-16 position in the document as it stands
//! when *that* component is applied, so encoding shifts every change by the
//! net length of the changes before it and decoding undoes the shift.

use serde_json::{Map, Value};

use crate::change::{Change, ChangeSet};
use crate::path::Path;
use crate::position::{utf16_len, Utf16Doc};
use crate::CodecError;

const INSERT_KEY: &str = "si";
const DELETE_KEY: &str = "sd";
const PATH_KEY: &str = "p";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatEdit {
    Insert(String),
    Delete(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatComponent {
    /// Location of the string being edited.
    pub path: Path,
    /// UTF-16 offset at apply time.
    pub offset: usize,
    pub edit: FlatEdit,
}

pub type FlatOp = Vec<FlatComponent>;

impl FlatComponent {
    pub fn insert(path: Path, offset: usize, text: impl Into<String>) -> Self {
        Self { path, offset, edit: FlatEdit::Insert(text.into()) }
    }

    pub fn delete(path: Path, offset: usize, text: impl Into<String>) -> Self {
        Self { path, offset, edit: FlatEdit::Delete(text.into()) }
    }

    pub fn to_json(&self) -> Value {
        let mut p = self.path.to_json_vec();
        p.push(Value::from(self.offset));
        let mut map = Map::new();
        map.insert(PATH_KEY.to_string(), Value::Array(p));
        match &self.edit {
            FlatEdit::Insert(s) => map.insert(INSERT_KEY.to_string(), Value::String(s.clone())),
            FlatEdit::Delete(s) => map.insert(DELETE_KEY.to_string(), Value::String(s.clone())),
        };
        Value::Object(map)
    }

    pub fn from_json(v: &Value) -> Result<Self, CodecError> {
        let invalid = |why: &str| CodecError::InvalidComponent(format!("{why}: {v}"));
        let map = v.as_object().ok_or_else(|| invalid("not an object"))?;
        let p = map
            .get(PATH_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("missing or non-array p"))?;
        let (last, keys) = p.split_last().ok_or_else(|| invalid("empty p"))?;
        let offset = last
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid("p does not end in an offset"))?;
        let path = Path::from_json_slice(keys).ok_or_else(|| invalid("bad key in p"))?;
        let edit = match (map.get(INSERT_KEY), map.get(DELETE_KEY)) {
            (Some(Value::String(s)), None) => FlatEdit::Insert(s.clone()),
            (None, Some(Value::String(s))) => FlatEdit::Delete(s.clone()),
            (None, None) => return Err(invalid("neither si nor sd")),
            _ => return Err(invalid("si/sd must be a single string")),
        };
        Ok(Self { path, offset, edit })
    }
}

pub fn to_json(op: &FlatOp) -> Value {
    Value::Array(op.iter().map(FlatComponent::to_json).collect())
}

pub fn from_json(v: &Value) -> Result<FlatOp, CodecError> {
    v.as_array()
        .ok_or_else(|| CodecError::InvalidComponent(format!("flat op must be an array: {v}")))?
        .iter()
        .map(FlatComponent::from_json)
        .collect()
}

/// Encode `changes` against the pre-edit document `doc`.
pub fn encode(path: &Path, changes: &ChangeSet, doc: &str) -> Result<FlatOp, CodecError> {
    let units = Utf16Doc::new(doc);
    let mut op = FlatOp::new();
    let mut inserted = 0;
    let mut deleted = 0;
    for change in changes {
        let offset = change.from + inserted - deleted;
        if change.from != change.to {
            let text = units.slice(change.from, change.to)?;
            deleted += change.to - change.from;
            op.push(FlatComponent::delete(path.clone(), offset, text));
        }
        if !change.insert.is_empty() {
            inserted += utf16_len(&change.insert);
            op.push(FlatComponent::insert(path.clone(), offset, change.insert.clone()));
        }
    }
    Ok(op)
}

/// Decode a flat op back into changes against the pre-edit document.
///
/// An insert directly after a delete at the same `p` merges into a single
/// replacement.
pub fn decode(op: &[FlatComponent]) -> Vec<Change> {
    let mut changes: Vec<Change> = Vec::with_capacity(op.len());
    let mut inserted = 0usize;
    let mut deleted = 0usize;
    let mut prev: Option<&FlatComponent> = None;
    for comp in op {
        let from = (comp.offset + deleted).saturating_sub(inserted);
        match &comp.edit {
            FlatEdit::Insert(text) => {
                let replaces_prev = prev.is_some_and(|p| {
                    matches!(p.edit, FlatEdit::Delete(_)) && p.path == comp.path && p.offset == comp.offset
                });
                let last = changes.last_mut().filter(|_| replaces_prev);
                if let Some(last) = last {
                    last.insert = text.clone();
                } else {
                    changes.push(Change::insert(from, text.clone()));
                }
                inserted += utf16_len(text);
            }
            FlatEdit::Delete(text) => {
                let len = utf16_len(text);
                changes.push(Change::delete(from, from + len));
                deleted += len;
            }
        }
        prev = Some(comp);
    }
    changes
}

pub fn decode_json(v: &Value) -> Result<Vec<Change>, CodecError> {
    Ok(decode(&from_json(v)?))
}

/// Apply `op` to a single text document. Paths are not consulted.
pub fn apply(doc: &str, op: &[FlatComponent]) -> Result<String, CodecError> {
    let mut units = Utf16Doc::new(doc);
    for comp in op {
        match &comp.edit {
            FlatEdit::Insert(text) => units.splice(comp.offset, comp.offset, text)?,
            FlatEdit::Delete(text) => {
                let to = comp.offset + utf16_len(text);
                if units.slice(comp.offset, to)? != *text {
                    return Err(CodecError::DeleteMismatch);
                }
                units.splice(comp.offset, to, "")?;
            }
        }
    }
    units.to_string_checked()
}

/// The op that undoes `op`.
pub fn invert(op: &[FlatComponent]) -> FlatOp {
    op.iter()
        .rev()
        .map(|comp| FlatComponent {
            path: comp.path.clone(),
            offset: comp.offset,
            edit: match &comp.edit {
                FlatEdit::Insert(s) => FlatEdit::Delete(s.clone()),
                FlatEdit::Delete(s) => FlatEdit::Insert(s.clone()),
            },
        })
        .collect()
}
