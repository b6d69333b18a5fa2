//! Typed view of json1 wire operations.
//!
//! Remote operations arrive as arbitrary JSON. [`Operation::from_json`] sniffs
//! the shape once, so the matcher, reconstructor and sequential decoder work
//! on a closed set of variants instead of re-inspecting raw arrays.

use ot_text_unicode::{component_from_json, component_to_json, TextComponent, TextOp};
use serde_json::{Map, Value};

use crate::constants::{DROP_KEY, EDIT_KEY, FAN_OUT_KEY, INSERT_KEY, PICK_KEY, REMOVE_KEY};
use crate::path::{Path, PathKey};

// ── Components ──────────────────────────────────────────────────────────

/// One element of an embedded `es` list.
#[derive(Debug, Clone, PartialEq)]
pub enum EditElement {
    Known(TextComponent),
    /// Anything the text-unicode wire format does not define. Decoders skip it.
    Unrecognized(Value),
}

impl EditElement {
    pub fn from_json(v: &Value) -> Self {
        match component_from_json(v) {
            Ok(c) => EditElement::Known(c),
            Err(_) => EditElement::Unrecognized(v.clone()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            EditElement::Known(c) => component_to_json(c),
            EditElement::Unrecognized(v) => v.clone(),
        }
    }

    pub fn as_known(&self) -> Option<&TextComponent> {
        match self {
            EditElement::Known(c) => Some(c),
            EditElement::Unrecognized(_) => None,
        }
    }
}

/// The trailing object of a json1 descent.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// `{es: [...]}`: embedded text-unicode edit.
    Edit(Vec<EditElement>),
    /// `{r: old, i: new}`: whole-value replacement.
    Replace { old: Value, new: Value },
    /// `{r: old}`: whole-value removal.
    Remove { old: Value },
    /// `{p: slot}` without a matching drop: the value is moved away.
    Pick(Value),
    /// `{i: value}`: creation of a value that did not exist.
    Insert(Value),
    /// Any other object, kept verbatim.
    Other(Map<String, Value>),
}

impl Component {
    pub fn edit(op: &TextOp) -> Self {
        Component::Edit(op.iter().cloned().map(EditElement::Known).collect())
    }

    pub fn from_json(v: &Value) -> Option<Self> {
        let map = v.as_object()?;
        if let Some(es) = map.get(EDIT_KEY) {
            return Some(match es.as_array() {
                Some(items) => Component::Edit(items.iter().map(EditElement::from_json).collect()),
                None => Component::Other(map.clone()),
            });
        }
        if let Some(old) = map.get(REMOVE_KEY) {
            return Some(match map.get(INSERT_KEY) {
                Some(new) => Component::Replace { old: old.clone(), new: new.clone() },
                None => Component::Remove { old: old.clone() },
            });
        }
        if let Some(slot) = map.get(PICK_KEY) {
            return Some(Component::Pick(slot.clone()));
        }
        if let Some(value) = map.get(INSERT_KEY) {
            return Some(Component::Insert(value.clone()));
        }
        Some(Component::Other(map.clone()))
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        match self {
            Component::Edit(elements) => {
                let es = elements.iter().map(EditElement::to_json).collect();
                map.insert(EDIT_KEY.to_string(), Value::Array(es));
            }
            Component::Replace { old, new } => {
                map.insert(REMOVE_KEY.to_string(), old.clone());
                map.insert(INSERT_KEY.to_string(), new.clone());
            }
            Component::Remove { old } => {
                map.insert(REMOVE_KEY.to_string(), old.clone());
            }
            Component::Pick(slot) => {
                map.insert(PICK_KEY.to_string(), slot.clone());
            }
            Component::Insert(value) => {
                map.insert(INSERT_KEY.to_string(), value.clone());
            }
            Component::Other(other) => return Value::Object(other.clone()),
        }
        Value::Object(map)
    }

    pub fn is_text_edit(&self) -> bool {
        matches!(self, Component::Edit(_))
    }
}

// ── Operation shapes ────────────────────────────────────────────────────

/// `[...prefix, [destination, {d: slot}], [source, {p: slot}]]`.
///
/// json1 sorts sibling descents by key, so the pick half may come first.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOp {
    pub prefix: Path,
    pub destination: PathKey,
    pub source: PathKey,
    pub drop_slot: Value,
    pub pick_slot: Value,
    pub pick_first: bool,
}

impl MoveOp {
    pub fn source_path(&self) -> Path {
        self.prefix.child(self.source.clone())
    }

    pub fn destination_path(&self) -> Path {
        self.prefix.child(self.destination.clone())
    }

    fn from_tail(prefix: &[Value], a: &Value, b: &Value) -> Option<Self> {
        let (a_key, a_slot) = descent_pair(a)?;
        let (b_key, b_slot) = descent_pair(b)?;
        let prefix = Path::from_json_slice(prefix)?;
        let drop_of = |slot: &Map<String, Value>| slot.get(DROP_KEY).cloned();
        let pick_of = |slot: &Map<String, Value>| slot.get(PICK_KEY).cloned();
        if let (Some(drop_slot), Some(pick_slot)) = (drop_of(a_slot), pick_of(b_slot)) {
            return Some(Self {
                prefix,
                destination: a_key,
                source: b_key,
                drop_slot,
                pick_slot,
                pick_first: false,
            });
        }
        if let (Some(pick_slot), Some(drop_slot)) = (pick_of(a_slot), drop_of(b_slot)) {
            return Some(Self {
                prefix,
                destination: b_key,
                source: a_key,
                drop_slot,
                pick_slot,
                pick_first: true,
            });
        }
        None
    }

    pub fn to_json(&self) -> Value {
        let drop = Value::Array(vec![self.destination.to_json(), slot(DROP_KEY, &self.drop_slot)]);
        let pick = Value::Array(vec![self.source.to_json(), slot(PICK_KEY, &self.pick_slot)]);
        let mut items = self.prefix.to_json_vec();
        if self.pick_first {
            items.extend([pick, drop]);
        } else {
            items.extend([drop, pick]);
        }
        Value::Array(items)
    }
}

fn slot(key: &str, value: &Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value.clone());
    Value::Object(map)
}

fn descent_pair(v: &Value) -> Option<(PathKey, &Map<String, Value>)> {
    match v.as_array()?.as_slice() {
        [key, obj] => Some((PathKey::from_json(key)?, obj.as_object()?)),
        _ => None,
    }
}

/// One sibling document's edit inside a fan-out operation:
/// `[id, ...path, component]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FanOutEntry {
    pub id: PathKey,
    pub path: Path,
    pub component: Component,
}

impl FanOutEntry {
    pub fn from_json(v: &Value) -> Option<Self> {
        let (first, rest) = v.as_array()?.split_first()?;
        let id = PathKey::from_json(first)?;
        let (last, keys) = rest.split_last()?;
        Some(Self {
            id,
            path: Path::from_json_slice(keys)?,
            component: Component::from_json(last)?,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut items = vec![self.id.to_json()];
        items.extend(self.path.to_json_vec());
        items.push(self.component.to_json());
        Value::Array(items)
    }

    pub fn is_text_edit(&self) -> bool {
        self.component.is_text_edit()
    }
}

/// `[key, entry, entry, ...]`: edits to sibling documents multiplexed under
/// one collection key.
#[derive(Debug, Clone, PartialEq)]
pub struct FanOutOp {
    pub key: String,
    pub entries: Vec<FanOutEntry>,
}

impl FanOutOp {
    pub fn to_json(&self) -> Value {
        let mut items = vec![Value::String(self.key.clone())];
        items.extend(self.entries.iter().map(FanOutEntry::to_json));
        Value::Array(items)
    }
}

/// A json1 operation, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// `[...path, component]`.
    Regular { path: Path, component: Component },
    Move(MoveOp),
    FanOut(FanOutOp),
    /// `[[...], [...], ...]`: independent operations.
    Batch(Vec<Operation>),
}

impl Operation {
    /// Classify `v` using the default fan-out key. `None` for null, non-array,
    /// empty, or otherwise unrecognizable values.
    pub fn from_json(v: &Value) -> Option<Self> {
        Self::from_json_with(v, FAN_OUT_KEY)
    }

    pub fn from_json_with(v: &Value, fan_out_key: &str) -> Option<Self> {
        let items = v.as_array()?;
        let first = items.first()?;

        if first.is_array() {
            // A root-level move also starts with an array.
            if let [a, b] = items.as_slice() {
                if let Some(mv) = MoveOp::from_tail(&[], a, b) {
                    return Some(Operation::Move(mv));
                }
            }
            let parts: Vec<Operation> = items
                .iter()
                .filter_map(|part| {
                    let parsed = Self::from_json_with(part, fan_out_key);
                    if parsed.is_none() {
                        tracing::trace!(part = %part, "skipping unrecognized batch part");
                    }
                    parsed
                })
                .collect();
            return Some(Operation::Batch(parts));
        }

        if first.as_str() == Some(fan_out_key) && items.get(1).is_some_and(Value::is_array) {
            let entries = items[1..]
                .iter()
                .filter_map(|entry| {
                    let parsed = FanOutEntry::from_json(entry);
                    if parsed.is_none() {
                        tracing::trace!(entry = %entry, "skipping malformed fan-out entry");
                    }
                    parsed
                })
                .collect();
            return Some(Operation::FanOut(FanOutOp { key: fan_out_key.to_string(), entries }));
        }

        if let [prefix @ .., a, b] = items.as_slice() {
            if a.is_array() && b.is_array() {
                return MoveOp::from_tail(prefix, a, b).map(Operation::Move);
            }
        }

        let (last, keys) = items.split_last()?;
        Some(Operation::Regular {
            path: Path::from_json_slice(keys)?,
            component: Component::from_json(last)?,
        })
    }

    pub fn to_json(&self) -> Value {
        match self {
            Operation::Regular { path, component } => {
                let mut items = path.to_json_vec();
                items.push(component.to_json());
                Value::Array(items)
            }
            Operation::Move(op) => op.to_json(),
            Operation::FanOut(op) => op.to_json(),
            Operation::Batch(parts) => Value::Array(parts.iter().map(Operation::to_json).collect()),
        }
    }

    /// The independent parts of this operation: a batch's elements, or the
    /// operation itself.
    pub fn parts(&self) -> &[Operation] {
        match self {
            Operation::Batch(parts) => parts,
            other => std::slice::from_ref(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_regular_edit() {
        let v = json!(["content", "files", "2432", "text", {"es": [5, "-", {"d": " "}]}]);
        let op = Operation::from_json(&v).unwrap();
        let Operation::Regular { path, component } = &op else {
            panic!("expected regular op, got {op:?}");
        };
        assert_eq!(path, &Path::new(["content", "files", "2432", "text"]));
        assert!(component.is_text_edit());
        assert_eq!(op.to_json(), v);
    }

    #[test]
    fn classifies_whole_value_components() {
        let replace = Operation::from_json(&json!(["text", {"r": "a", "i": "b"}])).unwrap();
        assert!(matches!(
            replace,
            Operation::Regular { component: Component::Replace { .. }, .. }
        ));
        let remove = Operation::from_json(&json!(["text", {"r": true}])).unwrap();
        assert!(matches!(remove, Operation::Regular { component: Component::Remove { .. }, .. }));
        let pick = Operation::from_json(&json!(["text", {"p": 0}])).unwrap();
        assert!(matches!(pick, Operation::Regular { component: Component::Pick(_), .. }));
    }

    #[test]
    fn classifies_move_in_either_order() {
        let v = json!(["content", "files", "2432", ["newtext", {"d": 0}], ["text", {"p": 0}]]);
        let Some(Operation::Move(mv)) = Operation::from_json(&v) else {
            panic!("expected move");
        };
        assert_eq!(mv.source_path(), Path::new(["content", "files", "2432", "text"]));
        assert_eq!(mv.destination_path(), Path::new(["content", "files", "2432", "newtext"]));
        assert_eq!(Operation::Move(mv).to_json(), v);

        let v = json!(["doc", ["a", {"p": 0}], ["b", {"d": 0}]]);
        let Some(Operation::Move(mv)) = Operation::from_json(&v) else {
            panic!("expected move");
        };
        assert_eq!(mv.source, PathKey::from("a"));
        assert_eq!(mv.destination, PathKey::from("b"));
        assert_eq!(Operation::Move(mv).to_json(), v);
    }

    #[test]
    fn root_level_move_is_not_a_batch() {
        let v = json!([["b", {"d": 0}], ["a", {"p": 0}]]);
        let Some(Operation::Move(mv)) = Operation::from_json(&v) else {
            panic!("expected move");
        };
        assert_eq!(mv.source_path(), Path::new(["a"]));
    }

    #[test]
    fn classifies_fan_out() {
        let v = json!([
            "files",
            ["file1", {"i": {"name": "foo.js"}}],
            ["file2", "text", {"es": [0, "b"]}]
        ]);
        let Some(Operation::FanOut(fan)) = Operation::from_json(&v) else {
            panic!("expected fan-out");
        };
        assert_eq!(fan.entries.len(), 2);
        assert!(!fan.entries[0].is_text_edit());
        assert_eq!(fan.entries[1].path, Path::new(["text"]));
        assert_eq!(Operation::FanOut(fan).to_json(), v);
    }

    #[test]
    fn fan_out_key_followed_by_string_is_regular() {
        let v = json!(["files", "README.md", {"es": [5, " Beautiful "]}]);
        assert!(matches!(Operation::from_json(&v), Some(Operation::Regular { .. })));
    }

    #[test]
    fn custom_fan_out_key() {
        let v = json!(["docs", ["a", "body", {"es": ["x"]}]]);
        assert!(matches!(Operation::from_json_with(&v, "docs"), Some(Operation::FanOut(_))));
        assert!(Operation::from_json(&v).is_none());
    }

    #[test]
    fn classifies_batch_and_drops_bad_parts() {
        let v = json!([
            ["content", "text", {"es": ["x"]}],
            ["isInteracting", {"r": true}],
            [{"bogus": 1}, 7]
        ]);
        let op = Operation::from_json(&v).unwrap();
        assert_eq!(op.parts().len(), 2);
    }

    #[test]
    fn rejects_null_and_empty() {
        assert!(Operation::from_json(&Value::Null).is_none());
        assert!(Operation::from_json(&json!([])).is_none());
        assert!(Operation::from_json(&json!({"es": []})).is_none());
        assert!(Operation::from_json(&json!(["a", "b"])).is_none());
    }

    #[test]
    fn unknown_edit_elements_are_kept_as_unrecognized() {
        let op = Operation::from_json(&json!([{"es": [2, {"x": 1}, "a"]}])).unwrap();
        let Operation::Regular { component: Component::Edit(elements), .. } = op else {
            panic!("expected an edit, got {op:?}");
        };
        assert_eq!(elements[1], EditElement::Unrecognized(json!({"x": 1})));
        assert_eq!(elements[2], EditElement::Known(TextComponent::Insert("a".into())));
    }
}
