//! Action vocabulary generation.
//!
//! The vocabulary is derived from the *shape* of a state tree: every branch
//! contributes one identifier for itself and recurses into its children,
//! every scalar contributes one identifier and stops. Arrays are scalars, so
//! an array of objects still yields a single setter.
//!
//! A scalar root or an empty root branch yields exactly `SET_STATE`.

use crate::codec::{encode, is_round_trip_safe, is_supported_name, ActionId};
use crate::config::{NamePolicy, ReducerConfig};
use crate::tree::StateValue;
use crate::{Path, ReducerError, ReducerResult};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One generated action: its identifier and the path it updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    pub id: ActionId,
    pub path: Path,
}

/// Ordered set of actions generated from a state shape.
///
/// Order is pre-order: a branch's own identifier precedes its children's.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<ActionEntry>,
    index: HashMap<ActionId, usize>,
}

impl Vocabulary {
    /// Walk `state` and collect every reachable action.
    ///
    /// # Examples
    ///
    /// ```
    /// use tirea_reducer::{ReducerConfig, StateValue, Vocabulary};
    /// use serde_json::json;
    ///
    /// let state = StateValue::from(json!({"a": 1, "c": {"d": true}}));
    /// let vocab = Vocabulary::generate(&state, &ReducerConfig::default()).unwrap();
    /// let ids: Vec<&str> = vocab.ids().map(|id| id.as_str()).collect();
    /// assert_eq!(ids, ["SET_A", "SET_C", "SET_C__D"]);
    /// ```
    pub fn generate(state: &StateValue, config: &ReducerConfig) -> ReducerResult<Self> {
        let mut vocab = Vocabulary::default();

        match state.as_branch() {
            Some(root) if !root.is_empty() => {
                vocab.collect_children(state, &Path::root(), config.names)?;
            }
            _ => vocab.push(Path::root())?,
        }

        debug!(
            actions = vocab.len(),
            names = ?config.names,
            "generated action vocabulary"
        );
        Ok(vocab)
    }

    fn collect_children(
        &mut self,
        node: &StateValue,
        prefix: &Path,
        policy: NamePolicy,
    ) -> ReducerResult<()> {
        let Some(branch) = node.as_branch() else {
            return Ok(());
        };

        // Snapshot the handles so no lock is held while recursing.
        let children: Vec<(String, StateValue)> = branch
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (name, child) in children {
            let path = prefix.child(name.as_str());
            check_name(&path, &name, policy)?;
            self.push(path.clone())?;
            self.collect_children(&child, &path, policy)?;
        }
        Ok(())
    }

    fn push(&mut self, path: Path) -> ReducerResult<()> {
        let id = encode(&path);
        if let Some(&existing) = self.index.get(&id) {
            let first = self.entries[existing].path.clone();
            return Err(ReducerError::duplicate_action(id, first, path));
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push(ActionEntry { id, path });
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Path updated by `id`, if it belongs to this vocabulary.
    pub fn path_of(&self, id: &str) -> Option<&Path> {
        self.index.get(id).map(|&i| &self.entries[i].path)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ActionId> {
        self.entries.iter().map(|e| &e.id)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| &e.path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionEntry> {
        self.entries.iter()
    }

    pub fn into_ids(self) -> Vec<ActionId> {
        self.entries.into_iter().map(|e| e.id).collect()
    }
}

fn check_name(path: &Path, name: &str, policy: NamePolicy) -> ReducerResult<()> {
    match policy {
        NamePolicy::Strict => {
            if !is_supported_name(name) {
                return Err(ReducerError::unsupported_name(path.clone(), name));
            }
            if path.len() == 1 && name == "state" {
                return Err(ReducerError::reserved_name(name));
            }
        }
        NamePolicy::Lenient => {
            if !is_round_trip_safe(path) {
                warn!(%path, "property path does not round-trip through its action identifier");
            }
        }
    }
    Ok(())
}
