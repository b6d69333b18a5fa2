use ot_text_unicode::TextOpError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("invalid operation component: {0}")]
    InvalidComponent(String),
    #[error("change {index} has from > to")]
    InvertedChange { index: usize },
    #[error("change {index} overlaps or precedes the previous change")]
    UnorderedChange { index: usize },
    #[error("range {from}..{to} extends past end of document ({len} UTF-16 units)")]
    OutOfBounds { from: usize, to: usize, len: usize },
    #[error("offset {0} splits a surrogate pair")]
    SplitSurrogate(usize),
    #[error("deleted text does not match document")]
    DeleteMismatch,
    #[error("no value at {0}")]
    PathNotFound(String),
    #[error("value at {0} is not a string")]
    NotAString(String),
    #[error(transparent)]
    Text(#[from] TextOpError),
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid sync options: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fan-out key must not be empty")]
    EmptyFanOutKey,
}
