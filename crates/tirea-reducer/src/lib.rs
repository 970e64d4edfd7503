//! Action vocabulary and reducer generation from nested state shapes.
//!
//! `tirea-reducer` looks at the shape of an initial state tree, derives one
//! flat action identifier per updatable property, and builds a single
//! dispatch function that applies those actions to later snapshots.
//!
//! # Core Concepts
//!
//! - **Path**: ordered property names from the root to a property
//! - **ActionId**: `SET_` identifier encoding a path (`SET_C__INNER_VALUE`)
//! - **Vocabulary**: every action reachable from a state shape, in pre-order
//! - **ReducerTable**: immutable map from identifier to [`Updater`]
//! - **Reducer**: shared dispatch handle; unknown actions are identity
//!
//! # Quick Start
//!
//! ```
//! use tirea_reducer::{generate_from, StateValue, UpdateRequest};
//! use serde_json::json;
//!
//! let generated = generate_from(json!({"a": 1, "c": {"d": true, "e": false}})).unwrap();
//! assert_eq!(generated.actions, ["SET_A", "SET_C", "SET_C__D", "SET_C__E"]);
//!
//! let state = StateValue::from(json!({"a": 2, "c": {"d": true, "e": false}}));
//! let next = generated
//!     .reducer
//!     .dispatch(&state, UpdateRequest::new("SET_A", 3).with_handler(|cur, p| {
//!         let sum = cur.to_value().as_i64().unwrap_or(0) + p.to_value().as_i64().unwrap_or(0);
//!         StateValue::from(sum)
//!     }));
//! assert_eq!(next.get("a").unwrap(), json!(5));
//! ```
//!
//! # Snapshot sharing
//!
//! By default updaters copy only the root (see [`CloneStrategy`]). A write
//! two or more levels deep is visible through the input snapshot as well.
//! Use [`CloneStrategy::PathCopy`] when the input must stay untouched.

mod codec;
mod config;
mod error;
mod path;
mod reducer;
mod setup;
mod tree;
mod vocabulary;

pub use codec::{check_path, decode, encode, is_round_trip_safe, is_supported_name, ActionId};
pub use config::{CloneStrategy, NamePolicy, ReducerConfig};
pub use error::{ReducerError, ReducerResult};
pub use path::Path;
pub use reducer::{MergeFn, Reducer, ReducerTable, UpdateOp, UpdateRequest, Updater};
pub use setup::{generate_from, generate_from_with, Generated};
pub use tree::{Branch, Children, StateValue};
pub use vocabulary::{ActionEntry, Vocabulary};

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
