//! Editor-side change descriptions.
//!
//! Offsets are UTF-16 code units and always refer to the document *before*
//! the change set is applied.

use serde::{Deserialize, Serialize};

use crate::position::Utf16Doc;
use crate::CodecError;

/// Replace the text between `from` and `to` with `insert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub insert: String,
}

impl Change {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self { from: at, to: at, insert: text.into() }
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self { from, to, insert: String::new() }
    }

    pub fn replace(from: usize, to: usize, text: impl Into<String>) -> Self {
        Self { from, to, insert: text.into() }
    }

    /// True when applying the change leaves the document untouched.
    pub fn is_empty(&self) -> bool {
        self.from == self.to && self.insert.is_empty()
    }
}

/// Ordered, non-overlapping changes against one original document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Change>", into = "Vec<Change>")]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    /// Validate and wrap `changes`. Neighbours may touch but not overlap.
    pub fn new(changes: Vec<Change>) -> Result<Self, CodecError> {
        let mut prev_to = 0;
        for (index, change) in changes.iter().enumerate() {
            if change.from > change.to {
                return Err(CodecError::InvertedChange { index });
            }
            if index > 0 && change.from < prev_to {
                return Err(CodecError::UnorderedChange { index });
            }
            prev_to = change.to;
        }
        Ok(Self { changes })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// True when no change in the set alters the document.
    pub fn is_noop(&self) -> bool {
        self.changes.iter().all(Change::is_empty)
    }

    pub fn into_vec(self) -> Vec<Change> {
        self.changes
    }

    /// Apply the set to `doc`, returning the post-edit document.
    pub fn apply(&self, doc: &str) -> Result<String, CodecError> {
        let mut units = Utf16Doc::new(doc);
        // Walk backwards so earlier offsets stay valid.
        for change in self.changes.iter().rev() {
            units.splice(change.from, change.to, &change.insert)?;
        }
        units.to_string_checked()
    }
}

impl TryFrom<Vec<Change>> for ChangeSet {
    type Error = CodecError;

    fn try_from(changes: Vec<Change>) -> Result<Self, CodecError> {
        Self::new(changes)
    }
}

impl From<ChangeSet> for Vec<Change> {
    fn from(set: ChangeSet) -> Self {
        set.changes
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
