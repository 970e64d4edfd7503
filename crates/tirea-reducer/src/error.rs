//! Error types for vocabulary and reducer setup.
//!
//! Only setup can fail. Dispatching through a built reducer never returns an
//! error: unknown action types pass the state through unchanged.

use crate::{ActionId, Path};
use thiserror::Error;

/// Result type alias for tirea-reducer operations.
pub type ReducerResult<T> = Result<T, ReducerError>;

/// Errors that can occur while deriving actions or building a reducer.
#[derive(Debug, Error)]
pub enum ReducerError {
    /// A property name cannot be encoded into an action identifier that
    /// decodes back to the same name.
    #[error("unsupported property name {name:?} at {path}: names must be ASCII letters only")]
    UnsupportedPropertyName {
        /// Path of the offending property.
        path: Path,
        /// The property name.
        name: String,
    },

    /// A top-level property would encode to the reserved whole-state identifier.
    #[error("property name {name:?} is reserved at the top level")]
    ReservedName {
        /// The property name.
        name: String,
    },

    /// Two distinct paths encode to the same identifier.
    #[error("action {id} is produced by both {first} and {second}")]
    DuplicateAction {
        /// The colliding identifier.
        id: ActionId,
        /// Path that claimed the identifier first.
        first: Path,
        /// Path that collided with it.
        second: Path,
    },

    /// An identifier does not follow the `SET_` grammar.
    #[error("malformed action identifier: {id}")]
    MalformedActionId {
        /// The rejected identifier.
        id: String,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReducerError {
    #[inline]
    pub fn unsupported_name(path: Path, name: impl Into<String>) -> Self {
        ReducerError::UnsupportedPropertyName {
            path,
            name: name.into(),
        }
    }

    #[inline]
    pub fn reserved_name(name: impl Into<String>) -> Self {
        ReducerError::ReservedName { name: name.into() }
    }

    #[inline]
    pub fn duplicate_action(id: ActionId, first: Path, second: Path) -> Self {
        ReducerError::DuplicateAction { id, first, second }
    }

    #[inline]
    pub fn malformed_action_id(id: impl Into<String>) -> Self {
        ReducerError::MalformedActionId { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_error_display() {
        let err = ReducerError::unsupported_name(path!("a", "b_c"), "b_c");
        let msg = err.to_string();
        assert!(msg.contains("unsupported property name"));
        assert!(msg.contains("$.a.b_c"));
    }

    #[test]
    fn test_duplicate_display_names_both_paths() {
        let err = ReducerError::duplicate_action(
            ActionId::from_raw("SET_A_B"),
            path!("aB"),
            path!("a_b"),
        );
        let msg = err.to_string();
        assert!(msg.contains("SET_A_B"));
        assert!(msg.contains("$.aB"));
        assert!(msg.contains("$.a_b"));
    }
}
