//! Setup-time options for vocabulary generation and reducer behavior.

use crate::ReducerResult;
use serde::{Deserialize, Serialize};

/// How property names that do not survive the identifier round-trip are
/// treated while generating the vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Reject unsupported names and the reserved top-level `state` property.
    #[default]
    Strict,
    /// Accept every name, logging a warning for each ambiguous path.
    Lenient,
}

/// Which nodes an updater copies when it writes below the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneStrategy {
    /// Copy only the root. Writes at depth two or more land in the branch
    /// shared with the input state, so the caller's snapshot changes too.
    #[default]
    ShallowRoot,
    /// Copy every branch on the written path. The input state is never
    /// modified and untouched siblings stay shared.
    PathCopy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducerConfig {
    pub names: NamePolicy,
    pub cloning: CloneStrategy,
}

impl ReducerConfig {
    pub fn with_names(mut self, names: NamePolicy) -> Self {
        self.names = names;
        self
    }

    pub fn with_cloning(mut self, cloning: CloneStrategy) -> Self {
        self.cloning = cloning;
        self
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ReducerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReducerError;

    #[test]
    fn test_defaults() {
        let config = ReducerConfig::default();
        assert_eq!(config.names, NamePolicy::Strict);
        assert_eq!(config.cloning, CloneStrategy::ShallowRoot);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ReducerConfig::from_json(r#"{"cloning": "path_copy"}"#).unwrap();
        assert_eq!(config.cloning, CloneStrategy::PathCopy);
        assert_eq!(config.names, NamePolicy::Strict);

        let config = ReducerConfig::from_json("{}").unwrap();
        assert_eq!(config, ReducerConfig::default());
    }

    #[test]
    fn test_from_json_rejects_unknown_variant() {
        let err = ReducerConfig::from_json(r#"{"names": "loose"}"#).unwrap_err();
        assert!(matches!(err, ReducerError::Serialization(_)));
    }

    #[test]
    fn test_builder() {
        let config = ReducerConfig::default()
            .with_names(NamePolicy::Lenient)
            .with_cloning(CloneStrategy::PathCopy);
        assert_eq!(config.names, NamePolicy::Lenient);
        assert_eq!(config.cloning, CloneStrategy::PathCopy);
    }
}
