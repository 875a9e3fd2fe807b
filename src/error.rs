//! Configuration errors.
//!
//! Nothing in the visibility core can fail at event-handling time; the only
//! misuse that is reported as a value is building a tooltip from an invalid
//! configuration.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown tooltip kind `{0}` (expected one of: default, inverse)")]
    UnknownKind(String),
    #[error("unknown tooltip position `{0}`")]
    UnknownPosition(String),
    #[error("{field} must not be empty")]
    EmptyClassName { field: &'static str },
}
