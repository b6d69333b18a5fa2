use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextOpError {
    #[error("invalid text op component: {0}")]
    InvalidComponent(String),
    #[error("text op must be an array")]
    NotAnArray,
    #[error("operation extends past end of document")]
    OutOfBounds,
    #[error("deleted text does not match document")]
    DeleteMismatch,
    #[error("count deletes cannot be inverted")]
    NotInvertible,
}
