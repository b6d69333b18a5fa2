//! Wire-level keys of json1 operations.

/// First element of a multi-document fan-out operation.
pub const FAN_OUT_KEY: &str = "files";

/// Embedded text-unicode edit: `{es: [...]}`.
pub const EDIT_KEY: &str = "es";

/// Drop half of a move (`{d: slot}`); inside `es` it marks a delete.
pub const DROP_KEY: &str = "d";

/// Pick-up half of a move: `{p: slot}`.
pub const PICK_KEY: &str = "p";

/// Whole-value remove: `{r: old}`.
pub const REMOVE_KEY: &str = "r";

/// Whole-value insert: `{i: new}`.
pub const INSERT_KEY: &str = "i";
