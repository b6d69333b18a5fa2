//! Document paths: sequences of object keys and array indices.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathKey {
    Index(u64),
    Key(String),
}

impl PathKey {
    /// Parse a wire value. Only strings and non-negative integers are keys.
    pub fn from_json(v: &Value) -> Option<Self> {
        match v {
            Value::String(s) => Some(PathKey::Key(s.clone())),
            Value::Number(n) => n.as_u64().map(PathKey::Index),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PathKey::Index(i) => Value::from(*i),
            PathKey::Key(s) => Value::String(s.clone()),
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathKey::Key(s) => Some(s),
            PathKey::Index(_) => None,
        }
    }
}

impl From<&str> for PathKey {
    fn from(s: &str) -> Self {
        PathKey::Key(s.to_string())
    }
}

impl From<String> for PathKey {
    fn from(s: String) -> Self {
        PathKey::Key(s)
    }
}

impl From<u64> for PathKey {
    fn from(i: u64) -> Self {
        PathKey::Index(i)
    }
}

impl From<usize> for PathKey {
    fn from(i: usize) -> Self {
        PathKey::Index(i as u64)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Index(i) => write!(f, "{i}"),
            PathKey::Key(s) => write!(f, "{s}"),
        }
    }
}

/// An immutable location in a tree-shaped document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathKey>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PathKey>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// Parse a JSON array of keys. Any non-key element rejects the whole path.
    pub fn from_json(v: &Value) -> Option<Self> {
        Self::from_json_slice(v.as_array()?)
    }

    pub fn from_json_slice(items: &[Value]) -> Option<Self> {
        items.iter().map(PathKey::from_json).collect::<Option<Vec<_>>>().map(Self)
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.to_json_vec())
    }

    pub fn to_json_vec(&self) -> Vec<Value> {
        self.0.iter().map(PathKey::to_json).collect()
    }

    pub fn keys(&self) -> &[PathKey] {
        &self.0
    }

    /// A new path with `key` appended.
    pub fn child(&self, key: impl Into<PathKey>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }

    /// A new path with all of `other`'s keys appended.
    pub fn concat(&self, other: &[PathKey]) -> Self {
        let mut keys = self.0.clone();
        keys.extend_from_slice(other);
        Self(keys)
    }

    /// True when `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &[PathKey]) -> bool {
        other.starts_with(&self.0)
    }

    /// Either path is a prefix of the other.
    pub fn overlaps(&self, other: &Path) -> bool {
        self.is_prefix_of(&other.0) || other.is_prefix_of(&self.0)
    }

    /// Index of the first occurrence of the object key `key`.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.0.iter().position(|k| k.as_key() == Some(key))
    }
}

impl std::ops::Deref for Path {
    type Target = [PathKey];

    fn deref(&self) -> &[PathKey] {
        &self.0
    }
}

impl From<Vec<PathKey>> for Path {
    fn from(keys: Vec<PathKey>) -> Self {
        Self(keys)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.0 {
            write!(f, "/{key}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_mixed_keys() {
        let path = Path::from_json(&json!(["files", 3, "text"])).unwrap();
        assert_eq!(
            path.keys(),
            &[PathKey::from("files"), PathKey::Index(3), PathKey::from("text")]
        );
        assert_eq!(path.to_json(), json!(["files", 3, "text"]));
    }

    #[test]
    fn rejects_non_key_elements() {
        assert!(Path::from_json(&json!(["a", {"es": []}])).is_none());
        assert!(Path::from_json(&json!(["a", -1])).is_none());
        assert!(Path::from_json(&json!("a")).is_none());
    }

    #[test]
    fn string_and_index_keys_differ() {
        assert_ne!(Path::new(["2432"]), Path::new([2432u64]));
    }

    #[test]
    fn prefix_relations() {
        let file = Path::new(["content", "files", "a", "text"]);
        let files = Path::new(["content", "files"]);
        assert!(files.is_prefix_of(&file));
        assert!(file.is_prefix_of(&file));
        assert!(!file.is_prefix_of(&files));
        assert!(file.overlaps(&files));
        assert!(!file.overlaps(&Path::new(["content", "files", "b"])));
        assert!(Path::root().is_prefix_of(&file));
    }

    #[test]
    fn serde_round_trip() {
        let path: Path = serde_json::from_value(json!(["files", 0])).unwrap();
        assert_eq!(path, Path::new([PathKey::from("files"), PathKey::Index(0)]));
        assert_eq!(serde_json::to_value(&path).unwrap(), json!(["files", 0]));
    }

    #[test]
    fn display_joins_with_slashes() {
        assert_eq!(Path::new(["files", "a"]).child(2usize).to_string(), "/files/a/2");
    }
}
