//! State tree values handled by the reducer.
//!
//! A [`StateValue`] is either an opaque scalar (anything that is not a JSON
//! object, arrays included) or a [`Branch`]: a shared handle to a mapping of
//! property names to child values.
//!
//! Branches are reference counted. Cloning a `StateValue` clones the handle,
//! so two values can point at the same branch and a write through one is
//! visible through the other. Reducers rely on this to share untouched
//! subtrees between snapshots, and [`StateValue::ptr_eq`] makes that sharing
//! observable.
//!
//! Inserting a branch into its own subtree creates a cycle; conversions and
//! comparisons do not terminate on cyclic trees.

use crate::Path;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Child values of a branch, ordered by property name.
pub type Children = BTreeMap<String, StateValue>;

/// Shared handle to a branch node.
#[derive(Clone, Default)]
pub struct Branch(Arc<RwLock<Children>>);

impl Branch {
    /// Create a new empty branch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_children(children: Children) -> Self {
        Self(Arc::new(RwLock::new(children)))
    }

    /// Lock the children for reading.
    ///
    /// Guards are never held across caller code by this crate, so a
    /// poisoned lock still holds consistent data and is recovered.
    pub fn read(&self) -> RwLockReadGuard<'_, Children> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Children> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a handle to a child value.
    pub fn get(&self, key: &str) -> Option<StateValue> {
        self.read().get(key).cloned()
    }

    /// Set a child value in place, returning the previous one.
    ///
    /// Every other handle to this branch observes the change.
    pub fn insert(
        &self,
        key: impl Into<String>,
        value: impl Into<StateValue>,
    ) -> Option<StateValue> {
        self.write().insert(key.into(), value.into())
    }

    /// Get the child branch at `key`, replacing an absent or scalar child
    /// with a new empty branch first.
    pub(crate) fn child_branch_or_insert(&self, key: &str) -> Branch {
        let mut children = self.write();
        if let Some(StateValue::Branch(existing)) = children.get(key) {
            return existing.clone();
        }
        let created = Branch::new();
        children.insert(key.to_owned(), StateValue::Branch(created.clone()));
        created
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy this branch one level deep: a new node whose children are
    /// handles to the same values.
    pub fn shallow_copy(&self) -> Branch {
        Branch::from_children(self.read().clone())
    }

    /// Copy this branch and every branch below it.
    pub fn deep_clone(&self) -> Branch {
        let children = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.deep_clone()))
            .collect();
        Branch::from_children(children)
    }

    /// Whether both handles point at the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Branch) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn to_map(&self) -> Map<String, Value> {
        self.read()
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect()
    }
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        *self.read() == *other.read()
    }
}

impl fmt::Debug for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.read().iter()).finish()
    }
}

/// A node of the state tree.
#[derive(Clone, PartialEq)]
pub enum StateValue {
    /// Atomic value: null, boolean, number, string or array.
    Scalar(Value),
    /// Object node with named children.
    Branch(Branch),
}

impl StateValue {
    #[inline]
    pub fn null() -> Self {
        StateValue::Scalar(Value::Null)
    }

    /// A new empty branch.
    #[inline]
    pub fn empty_branch() -> Self {
        StateValue::Branch(Branch::new())
    }

    #[inline]
    pub fn is_branch(&self) -> bool {
        matches!(self, StateValue::Branch(_))
    }

    #[inline]
    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            StateValue::Branch(b) => Some(b),
            StateValue::Scalar(_) => None,
        }
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            StateValue::Scalar(v) => Some(v),
            StateValue::Branch(_) => None,
        }
    }

    /// Get a handle to a direct child. Scalars have no children.
    pub fn get(&self, key: &str) -> Option<StateValue> {
        self.as_branch().and_then(|b| b.get(key))
    }

    /// Get a handle to the value at `path`. The empty path is `self`.
    pub fn at(&self, path: &Path) -> Option<StateValue> {
        path.iter().try_fold(self.clone(), |node, key| node.get(key))
    }

    /// Whether both values are handles to the same branch.
    ///
    /// Scalars have no identity and never compare pointer-equal.
    pub fn ptr_eq(&self, other: &StateValue) -> bool {
        match (self, other) {
            (StateValue::Branch(a), StateValue::Branch(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Snapshot the tree as plain JSON.
    pub fn to_value(&self) -> Value {
        match self {
            StateValue::Scalar(v) => v.clone(),
            StateValue::Branch(b) => Value::Object(b.to_map()),
        }
    }

    /// Copy the tree so no branch is shared with `self`.
    pub fn deep_clone(&self) -> StateValue {
        match self {
            StateValue::Scalar(v) => StateValue::Scalar(v.clone()),
            StateValue::Branch(b) => StateValue::Branch(b.deep_clone()),
        }
    }
}

impl Default for StateValue {
    fn default() -> Self {
        StateValue::null()
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Scalar(v) => write!(f, "{}", v),
            StateValue::Branch(b) => fmt::Debug::fmt(b, f),
        }
    }
}

impl PartialEq<Value> for StateValue {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (StateValue::Scalar(a), b) => a == b,
            (StateValue::Branch(branch), Value::Object(map)) => {
                let children = branch.read();
                children.len() == map.len()
                    && children
                        .iter()
                        .all(|(k, v)| map.get(k).is_some_and(|other| v == other))
            }
            (StateValue::Branch(_), _) => false,
        }
    }
}

impl From<Value> for StateValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                let children = map
                    .into_iter()
                    .map(|(k, v)| (k, StateValue::from(v)))
                    .collect();
                StateValue::Branch(Branch::from_children(children))
            }
            scalar => StateValue::Scalar(scalar),
        }
    }
}

impl From<Branch> for StateValue {
    fn from(branch: Branch) -> Self {
        StateValue::Branch(branch)
    }
}

impl From<&StateValue> for Value {
    fn from(value: &StateValue) -> Self {
        value.to_value()
    }
}

macro_rules! scalar_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for StateValue {
                fn from(v: $ty) -> Self {
                    StateValue::Scalar(Value::from(v))
                }
            }
        )+
    };
}

scalar_from!(bool, i32, i64, u32, u64, f64, &str, String);

impl Serialize for StateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StateValue::Scalar(v) => v.serialize(serializer),
            StateValue::Branch(b) => {
                let children = b.read();
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (k, v) in children.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for StateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(StateValue::from)
    }
}
