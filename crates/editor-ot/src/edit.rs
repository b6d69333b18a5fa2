//! json1 edit helpers over a `serde_json::Value` tree.
//!
//! [`edit_op`] wraps a text-unicode op at a path the way json1's `editOp`
//! does; [`apply_edit`] applies the subset of json1 that this crate produces
//! or routes: text edits, whole-value replace/remove/insert, moves and
//! fan-out entries.

use ot_text_unicode::{TextComponent, TextOp};
use serde_json::Value;

use crate::path::{Path, PathKey};
use crate::wire::{Component, EditElement, Operation};
use crate::CodecError;

/// A text-unicode op embedded at a document path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    pub path: Path,
    pub op: TextOp,
}

impl EditOp {
    pub fn new(path: Path, op: TextOp) -> Self {
        Self { path, op }
    }

    pub fn to_operation(&self) -> Operation {
        Operation::Regular { path: self.path.clone(), component: Component::edit(&self.op) }
    }

    /// `[...path, {es: op}]`
    pub fn to_json(&self) -> Value {
        self.to_operation().to_json()
    }

    pub fn apply_to(&self, doc: &mut Value) -> Result<(), CodecError> {
        apply_text(doc, &self.path, &self.op)
    }
}

/// Wire form of a text edit at `path`.
pub fn edit_op(path: &Path, op: &TextOp) -> Value {
    EditOp::new(path.clone(), op.clone()).to_json()
}

pub fn get_at_path<'a>(doc: &'a Value, path: &[PathKey]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |node, key| match (node, key) {
        (Value::Object(map), PathKey::Key(k)) => map.get(k),
        (Value::Array(items), PathKey::Index(i)) => items.get(usize::try_from(*i).ok()?),
        _ => None,
    })
}

fn get_at_path_mut<'a>(doc: &'a mut Value, path: &[PathKey]) -> Option<&'a mut Value> {
    path.iter().try_fold(doc, |node, key| match (node, key) {
        (Value::Object(map), PathKey::Key(k)) => map.get_mut(k),
        (Value::Array(items), PathKey::Index(i)) => items.get_mut(usize::try_from(*i).ok()?),
        _ => None,
    })
}

fn not_found(path: &[PathKey]) -> CodecError {
    CodecError::PathNotFound(Path::from(path.to_vec()).to_string())
}

/// Apply a json1 operation to `doc` in place.
///
/// On error `doc` may hold the effects of the parts applied before the
/// failing one.
pub fn apply_edit(doc: &mut Value, op: &Operation) -> Result<(), CodecError> {
    match op {
        Operation::Regular { path, component } => apply_component(doc, path, component),
        Operation::Move(mv) => {
            let value = take(doc, &mv.source_path())?;
            put(doc, &mv.destination_path(), value, false)
        }
        Operation::FanOut(fan) => {
            let base = Path::new([fan.key.as_str()]);
            for entry in &fan.entries {
                let path = base.child(entry.id.clone()).concat(&entry.path);
                apply_component(doc, &path, &entry.component)?;
            }
            Ok(())
        }
        Operation::Batch(parts) => parts.iter().try_for_each(|part| apply_edit(doc, part)),
    }
}

fn apply_component(doc: &mut Value, path: &Path, component: &Component) -> Result<(), CodecError> {
    match component {
        Component::Edit(elements) => {
            let op = elements
                .iter()
                .map(|e| match e {
                    EditElement::Known(c) => Ok(c.clone()),
                    EditElement::Unrecognized(v) => Err(CodecError::InvalidComponent(v.to_string())),
                })
                .collect::<Result<Vec<TextComponent>, _>>()?;
            apply_text(doc, path, &op)
        }
        Component::Replace { new, .. } => put(doc, path, new.clone(), true),
        Component::Insert(value) => put(doc, path, value.clone(), false),
        Component::Remove { .. } | Component::Pick(_) => take(doc, path).map(drop),
        Component::Other(map) => Err(CodecError::InvalidComponent(Value::Object(map.clone()).to_string())),
    }
}

fn apply_text(doc: &mut Value, path: &[PathKey], op: &TextOp) -> Result<(), CodecError> {
    let node = get_at_path_mut(doc, path).ok_or_else(|| not_found(path))?;
    let Value::String(text) = node else {
        return Err(CodecError::NotAString(Path::from(path.to_vec()).to_string()));
    };
    *text = ot_text_unicode::apply(text, op)?;
    Ok(())
}

fn take(doc: &mut Value, path: &[PathKey]) -> Result<Value, CodecError> {
    let Some((last, parent)) = path.split_last() else {
        return Ok(std::mem::take(doc));
    };
    let removed = match (get_at_path_mut(doc, parent), last) {
        (Some(Value::Object(map)), PathKey::Key(k)) => map.remove(k),
        (Some(Value::Array(items)), PathKey::Index(i)) => {
            let i = usize::try_from(*i).map_err(|_| not_found(path))?;
            (i < items.len()).then(|| items.remove(i))
        }
        _ => None,
    };
    removed.ok_or_else(|| not_found(path))
}

/// Write `value` at `path`. Inside an array, `overwrite` replaces the element
/// at the index; otherwise the value is inserted before it.
fn put(doc: &mut Value, path: &[PathKey], value: Value, overwrite: bool) -> Result<(), CodecError> {
    let Some((last, parent)) = path.split_last() else {
        *doc = value;
        return Ok(());
    };
    match (get_at_path_mut(doc, parent), last) {
        (Some(Value::Object(map)), PathKey::Key(k)) => {
            map.insert(k.clone(), value);
            Ok(())
        }
        (Some(Value::Array(items)), PathKey::Index(i)) => {
            let i = usize::try_from(*i).map_err(|_| not_found(path))?;
            if overwrite {
                let slot = items.get_mut(i).ok_or_else(|| not_found(path))?;
                *slot = value;
            } else if i <= items.len() {
                items.insert(i, value);
            } else {
                return Err(not_found(path));
            }
            Ok(())
        }
        _ => Err(not_found(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "content": {
                "files": {
                    "2432": {"name": "index.js", "text": "Hello World"}
                }
            }
        })
    }

    fn parse(v: Value) -> Operation {
        Operation::from_json(&v).unwrap()
    }

    #[test]
    fn edit_op_wraps_text_op_at_path() {
        let op = ot_text_unicode::insert(5, "-");
        assert_eq!(edit_op(&Path::new(["title"]), &op), json!(["title", {"es": [5, "-"]}]));
        assert_eq!(edit_op(&Path::root(), &op), json!([{"es": [5, "-"]}]));
    }

    #[test]
    fn applies_text_edit() {
        let mut d = doc();
        let path = Path::new(["content", "files", "2432", "text"]);
        let op = ot_text_unicode::compose(
            &ot_text_unicode::remove(5, " "),
            &ot_text_unicode::insert(5, "-"),
        );
        EditOp::new(path.clone(), op).apply_to(&mut d).unwrap();
        assert_eq!(get_at_path(&d, &path), Some(&json!("Hello-World")));
    }

    #[test]
    fn rejects_mismatched_delete() {
        let mut d = doc();
        let op = parse(json!(["content", "files", "2432", "text", {"es": [{"d": "Bye"}]}]));
        assert!(matches!(apply_edit(&mut d, &op), Err(CodecError::Text(_))));
    }

    #[test]
    fn reports_missing_and_non_string_targets() {
        let mut d = doc();
        let missing = parse(json!(["content", "files", "nope", "text", {"es": ["x"]}]));
        assert_eq!(
            apply_edit(&mut d, &missing),
            Err(CodecError::PathNotFound("/content/files/nope/text".into()))
        );
        let not_string = parse(json!(["content", "files", {"es": ["x"]}]));
        assert!(matches!(apply_edit(&mut d, &not_string), Err(CodecError::NotAString(_))));
    }

    #[test]
    fn applies_whole_value_components() {
        let mut d = doc();
        let replace = parse(json!(["content", "files", "2432", "text", {"r": true, "i": "New"}]));
        apply_edit(&mut d, &replace).unwrap();
        assert_eq!(d["content"]["files"]["2432"]["text"], json!("New"));

        let remove = parse(json!(["content", "files", "2432", "text", {"r": true}]));
        apply_edit(&mut d, &remove).unwrap();
        assert!(d["content"]["files"]["2432"].get("text").is_none());
    }

    #[test]
    fn applies_move() {
        let mut d = doc();
        let mv = parse(json!(["content", "files", "2432", ["newtext", {"d": 0}], ["text", {"p": 0}]]));
        apply_edit(&mut d, &mv).unwrap();
        assert_eq!(d["content"]["files"]["2432"]["newtext"], json!("Hello World"));
        assert!(d["content"]["files"]["2432"].get("text").is_none());
    }

    #[test]
    fn applies_fan_out_entries_under_key() {
        let mut d = json!({"files": {"a": {"text": "abc"}}});
        let op = parse(json!([
            "files",
            ["a", "text", {"es": [3, "d"]}],
            ["b", {"i": {"text": ""}}]
        ]));
        apply_edit(&mut d, &op).unwrap();
        assert_eq!(d, json!({"files": {"a": {"text": "abcd"}, "b": {"text": ""}}}));
    }

    #[test]
    fn array_insert_and_remove() {
        let mut d = json!({"list": ["a", "c"]});
        apply_edit(&mut d, &parse(json!(["list", 1, {"i": "b"}]))).unwrap();
        assert_eq!(d, json!({"list": ["a", "b", "c"]}));
        apply_edit(&mut d, &parse(json!(["list", 0, {"r": true}]))).unwrap();
        assert_eq!(d, json!({"list": ["b", "c"]}));
    }
}
