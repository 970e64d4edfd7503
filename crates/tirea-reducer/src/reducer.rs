//! Dispatch table construction and update semantics.
//!
//! Each action identifier gets an [`Updater`] bound to its path. The
//! [`ReducerTable`] holding them is built once and never modified; a
//! [`Reducer`] shares it and routes [`UpdateRequest`]s by action type.
//!
//! # Cloning contract
//!
//! With [`CloneStrategy::ShallowRoot`] (the default) an updater copies only
//! the root of the state it is given:
//!
//! - a depth-1 write returns a new root; the input is untouched and every
//!   sibling is the same handle as before;
//! - a deeper write descends through the branches *shared with the input*,
//!   so the input's nested branch is modified in place as well.
//!
//! [`CloneStrategy::PathCopy`] copies every branch on the written path
//! instead, leaving the input unchanged at any depth.

use crate::codec::{decode, ActionId};
use crate::config::{CloneStrategy, ReducerConfig};
use crate::tree::{Branch, StateValue};
use crate::vocabulary::Vocabulary;
use crate::{Path, ReducerError, ReducerResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Binary merge of the current value at a path with an incoming payload.
///
/// An absent current value is passed as null.
pub type MergeFn = Arc<dyn Fn(&StateValue, StateValue) -> StateValue + Send + Sync>;

/// How a request's payload is combined with the value it targets.
#[derive(Clone, Default)]
pub enum UpdateOp {
    /// Store the payload as-is.
    #[default]
    Replace,
    /// Store `merge(current, payload)`.
    Merge(MergeFn),
}

impl UpdateOp {
    fn resolve(&self, current: Option<&StateValue>, payload: StateValue) -> StateValue {
        match self {
            UpdateOp::Replace => payload,
            UpdateOp::Merge(merge) => match current {
                Some(current) => merge(current, payload),
                None => merge(&StateValue::null(), payload),
            },
        }
    }
}

impl fmt::Debug for UpdateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOp::Replace => f.write_str("Replace"),
            UpdateOp::Merge(_) => f.write_str("Merge(<fn>)"),
        }
    }
}

/// A tagged update: which action, with what payload, combined how.
///
/// Deserializes from `{"type": "SET_A", "payload": 45}`; merge functions
/// cannot be deserialized and are attached with [`UpdateRequest::with_handler`].
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub payload: StateValue,
    #[serde(skip)]
    pub op: UpdateOp,
}

impl UpdateRequest {
    /// A request that replaces the target with `payload`.
    pub fn new(action_type: impl Into<String>, payload: impl Into<StateValue>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: payload.into(),
            op: UpdateOp::Replace,
        }
    }

    /// Combine the payload with the current value through `handler`.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateValue, StateValue) -> StateValue + Send + Sync + 'static,
    {
        self.op = UpdateOp::Merge(Arc::new(handler));
        self
    }

    pub fn from_json(value: Value) -> ReducerResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Applies one action to a state snapshot.
#[derive(Debug, Clone)]
pub struct Updater {
    path: Path,
    cloning: CloneStrategy,
}

impl Updater {
    pub fn new(path: Path, cloning: CloneStrategy) -> Self {
        Self { path, cloning }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Produce the next snapshot.
    ///
    /// The empty path discards `state` and returns the payload (or the
    /// merge of `state` with it).
    pub fn apply(&self, state: &StateValue, payload: StateValue, op: &UpdateOp) -> StateValue {
        let Some((last, parents)) = self.path.segments().split_last() else {
            return op.resolve(Some(state), payload);
        };

        let root = match state {
            StateValue::Branch(b) => b.shallow_copy(),
            StateValue::Scalar(_) => Branch::new(),
        };

        let mut cursor = root.clone();
        for key in parents {
            cursor = match self.cloning {
                CloneStrategy::ShallowRoot => cursor.child_branch_or_insert(key),
                CloneStrategy::PathCopy => copy_child(&cursor, key),
            };
        }

        let current = match op {
            UpdateOp::Replace => None,
            UpdateOp::Merge(_) => cursor.get(last),
        };
        cursor.insert(last.as_str(), op.resolve(current.as_ref(), payload));

        StateValue::Branch(root)
    }
}

/// Replace `parent[key]` with a shallow copy of itself (or a new branch when
/// it is absent or scalar) and return the copy.
fn copy_child(parent: &Branch, key: &str) -> Branch {
    let copy = match parent.get(key) {
        Some(StateValue::Branch(existing)) => existing.shallow_copy(),
        _ => Branch::new(),
    };
    parent.insert(key, copy.clone());
    copy
}

/// Immutable map from action identifier to updater.
#[derive(Debug, Clone, Default)]
pub struct ReducerTable {
    updaters: HashMap<ActionId, Updater>,
    actions: Vec<ActionId>,
    config: ReducerConfig,
}

impl ReducerTable {
    /// Build one updater per vocabulary entry, using each entry's path.
    pub fn build(vocabulary: &Vocabulary, config: &ReducerConfig) -> Self {
        let mut table = Self {
            config: config.clone(),
            ..Self::default()
        };
        for entry in vocabulary.iter() {
            table.insert(entry.id.clone(), entry.path.clone());
        }
        debug!(
            actions = table.len(),
            cloning = ?config.cloning,
            "built reducer table"
        );
        table
    }

    /// Build from bare identifiers, decoding each back into a path.
    ///
    /// Paths recovered this way are only faithful for identifiers whose
    /// property names are ASCII letters; prefer [`ReducerTable::build`].
    pub fn from_action_ids<I, S>(ids: I, config: &ReducerConfig) -> ReducerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self {
            config: config.clone(),
            ..Self::default()
        };
        for id in ids {
            let id = id.as_ref();
            let path = decode(id).ok_or_else(|| ReducerError::malformed_action_id(id))?;
            table.insert(ActionId::from_raw(id), path);
        }
        debug!(
            actions = table.len(),
            cloning = ?config.cloning,
            "built reducer table from identifiers"
        );
        Ok(table)
    }

    fn insert(&mut self, id: ActionId, path: Path) {
        if self.updaters.contains_key(&id) {
            return;
        }
        self.actions.push(id.clone());
        self.updaters.insert(id, Updater::new(path, self.config.cloning));
    }

    pub fn get(&self, action_type: &str) -> Option<&Updater> {
        self.updaters.get(action_type)
    }

    /// Identifiers in insertion order.
    pub fn actions(&self) -> &[ActionId] {
        &self.actions
    }

    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// The dispatch function over a shared, read-only [`ReducerTable`].
///
/// Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Reducer {
    table: Arc<ReducerTable>,
}

impl Reducer {
    pub fn new(table: ReducerTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Apply `request` to `state`.
    ///
    /// An action type missing from the table returns `state` itself (the
    /// same handle), never an error.
    pub fn dispatch(&self, state: &StateValue, request: UpdateRequest) -> StateValue {
        let Some(updater) = self.table.get(&request.action_type) else {
            debug!(action = %request.action_type, "ignoring unknown action");
            return state.clone();
        };
        trace!(action = %request.action_type, path = %updater.path(), "dispatching update");
        updater.apply(state, request.payload, &request.op)
    }

    /// Dispatch with a plain replace.
    pub fn set(
        &self,
        state: &StateValue,
        action_type: &str,
        payload: impl Into<StateValue>,
    ) -> StateValue {
        self.dispatch(state, UpdateRequest::new(action_type, payload))
    }

    pub fn contains(&self, action_type: &str) -> bool {
        self.table.get(action_type).is_some()
    }

    pub fn actions(&self) -> &[ActionId] {
        self.table.actions()
    }

    pub fn config(&self) -> &ReducerConfig {
        self.table.config()
    }

    pub fn table(&self) -> &ReducerTable {
        &self.table
    }

    /// Turn the reducer into a plain closure.
    pub fn into_fn(
        self,
    ) -> impl Fn(&StateValue, UpdateRequest) -> StateValue + Send + Sync + Clone {
        move |state: &StateValue, request: UpdateRequest| self.dispatch(state, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    fn shallow(path: Path) -> Updater {
        Updater::new(path, CloneStrategy::ShallowRoot)
    }

    #[test]
    fn test_whole_state_replace_discards_state() {
        let state = StateValue::from(json!({"a": 1}));
        let next = shallow(path!()).apply(&state, StateValue::from(7), &UpdateOp::Replace);
        assert_eq!(next, json!(7));
    }

    #[test]
    fn test_whole_state_merge_sees_state() {
        let state = StateValue::from(json!(2));
        let op = UpdateOp::Merge(Arc::new(|cur: &StateValue, p: StateValue| {
            let sum = cur.to_value().as_i64().unwrap() + p.to_value().as_i64().unwrap();
            StateValue::from(sum)
        }));
        let next = shallow(path!()).apply(&state, StateValue::from(3), &op);
        assert_eq!(next, json!(5));
    }

    #[test]
    fn test_absent_intermediate_is_materialized() {
        let state = StateValue::from(json!({"a": 1}));
        let next = shallow(path!("b", "c")).apply(&state, StateValue::from(2), &UpdateOp::Replace);
        assert_eq!(next, json!({"a": 1, "b": {"c": 2}}));
        // The new branch lives only in the new root.
        assert_eq!(state, json!({"a": 1}));
    }

    #[test]
    fn test_scalar_intermediate_is_replaced() {
        let state = StateValue::from(json!({"a": 1}));
        let next = shallow(path!("a", "b")).apply(&state, StateValue::from(2), &UpdateOp::Replace);
        assert_eq!(next, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_scalar_state_becomes_branch() {
        let state = StateValue::from(json!(5));
        let next = shallow(path!("a")).apply(&state, StateValue::from(1), &UpdateOp::Replace);
        assert_eq!(next, json!({"a": 1}));
    }

    #[test]
    fn test_merge_on_absent_value_receives_null() {
        let state = StateValue::from(json!({}));
        let op = UpdateOp::Merge(Arc::new(|cur: &StateValue, p: StateValue| {
            assert_eq!(*cur, json!(null));
            p
        }));
        let next = shallow(path!("a")).apply(&state, StateValue::from("x"), &op);
        assert_eq!(next, json!({"a": "x"}));
    }

    #[test]
    fn test_path_copy_leaves_input_untouched() {
        let state = StateValue::from(json!({"a": 1, "c": {"d": true, "e": {"f": 1}}}));
        let updater = Updater::new(path!("c", "d"), CloneStrategy::PathCopy);
        let next = updater.apply(&state, StateValue::from(false), &UpdateOp::Replace);

        assert_eq!(next, json!({"a": 1, "c": {"d": false, "e": {"f": 1}}}));
        assert_eq!(state, json!({"a": 1, "c": {"d": true, "e": {"f": 1}}}));
        assert!(!next.get("c").unwrap().ptr_eq(&state.get("c").unwrap()));
        // Untouched subtree stays shared.
        assert!(next
            .at(&path!("c", "e"))
            .unwrap()
            .ptr_eq(&state.at(&path!("c", "e")).unwrap()));
    }

    #[test]
    fn test_from_action_ids_rejects_malformed() {
        let err = ReducerTable::from_action_ids(["SET_A", "A"], &ReducerConfig::default())
            .unwrap_err();
        assert!(matches!(err, ReducerError::MalformedActionId { ref id } if id == "A"));
    }

    #[test]
    fn test_from_action_ids_ignores_repeats() {
        let table =
            ReducerTable::from_action_ids(["SET_A", "SET_A", "SET_B__C"], &ReducerConfig::default())
                .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("SET_B__C").unwrap().path(), &path!("b", "c"));
    }

    #[test]
    fn test_request_from_json() {
        let req = UpdateRequest::from_json(json!({"type": "SET_A", "payload": {"x": 1}})).unwrap();
        assert_eq!(req.action_type, "SET_A");
        assert_eq!(req.payload, json!({"x": 1}));
        assert!(matches!(req.op, UpdateOp::Replace));

        let req = UpdateRequest::from_json(json!({"type": "SET_A"})).unwrap();
        assert_eq!(req.payload, json!(null));

        assert!(UpdateRequest::from_json(json!({"payload": 1})).is_err());
    }

    #[test]
    fn test_reducer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Reducer>();
        assert_send_sync::<StateValue>();
    }
}
