//! Sequential text operational transformation addressed in Unicode code points.
//!
//! A [`TextOp`] is a left-to-right traversal of a string:
//! - [`TextComponent::Retain`]: skip `n` code points
//! - [`TextComponent::Insert`]: insert text at the cursor
//! - [`TextComponent::Delete`]: delete `n` code points (irreversible count form)
//! - [`TextComponent::DeleteStr`]: reversible delete storing the deleted text
//!
//! On the wire an op is a JSON array: numbers retain, strings insert and
//! `{"d": n}` / `{"d": "text"}` delete.
//!
//! # Example
//!
//! ```
//! use ot_text_unicode::{apply, compose, insert, remove, to_json};
//!
//! let op = compose(&remove(5, " "), &insert(5, "-"));
//! assert_eq!(to_json(&op), serde_json::json!([5, "-", {"d": " "}]));
//! assert_eq!(apply("Hello World", &op).unwrap(), "Hello-World");
//! ```

mod codec;
mod error;
mod ops;

pub use codec::{component_from_json, component_to_json, from_json, to_json};
pub use error::TextOpError;
pub use ops::{apply, compose, insert, invert, normalize, remove, remove_count, trim};

/// One step of a [`TextOp`] traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextComponent {
    Retain(usize),
    Insert(String),
    Delete(usize),
    DeleteStr(String),
}

/// A sequential text operation.
pub type TextOp = Vec<TextComponent>;

impl TextComponent {
    /// Length of this component (in code points) on the *source* string.
    pub fn src_len(&self) -> usize {
        match self {
            TextComponent::Retain(n) => *n,
            TextComponent::Delete(n) => *n,
            TextComponent::DeleteStr(s) => s.chars().count(),
            TextComponent::Insert(_) => 0,
        }
    }

    /// Length of this component (in code points) on the *destination* string.
    pub fn dst_len(&self) -> usize {
        match self {
            TextComponent::Retain(n) => *n,
            TextComponent::Delete(_) | TextComponent::DeleteStr(_) => 0,
            TextComponent::Insert(s) => s.chars().count(),
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, TextComponent::Delete(_) | TextComponent::DeleteStr(_))
    }

    /// True for components that carry no effect (`0`, `""`, `{d: 0}`).
    pub fn is_empty(&self) -> bool {
        match self {
            TextComponent::Retain(n) | TextComponent::Delete(n) => *n == 0,
            TextComponent::Insert(s) | TextComponent::DeleteStr(s) => s.is_empty(),
        }
    }
}

/// The algebra a sequential codec needs from a text OT type.
///
/// Implementations produce elementary operations and compose them; the codec
/// never inspects composition rules itself.
pub trait TextAlgebra {
    /// An operation inserting `text` at code point `pos`.
    fn insert(&self, pos: usize, text: &str) -> TextOp;
    /// An operation deleting `text` found at code point `pos`.
    fn remove(&self, pos: usize, text: &str) -> TextOp;
    /// An operation deleting `len` code points at `pos` without recording them.
    fn remove_count(&self, pos: usize, len: usize) -> TextOp;
    /// `op1` followed by `op2` as a single operation.
    fn compose(&self, op1: &TextOp, op2: &TextOp) -> TextOp;
    /// Minimal representation of `op`.
    fn normalize(&self, op: TextOp) -> TextOp;
}

/// The stock text-unicode algebra.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextUnicode;

impl TextAlgebra for TextUnicode {
    fn insert(&self, pos: usize, text: &str) -> TextOp {
        insert(pos, text)
    }

    fn remove(&self, pos: usize, text: &str) -> TextOp {
        remove(pos, text)
    }

    fn remove_count(&self, pos: usize, len: usize) -> TextOp {
        remove_count(pos, len)
    }

    fn compose(&self, op1: &TextOp, op2: &TextOp) -> TextOp {
        compose(op1, op2)
    }

    fn normalize(&self, op: TextOp) -> TextOp {
        normalize(op)
    }
}
