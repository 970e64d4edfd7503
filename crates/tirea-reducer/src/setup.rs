//! One-call setup: derive the vocabulary and its reducer from an initial state.

use crate::codec::ActionId;
use crate::config::ReducerConfig;
use crate::reducer::{Reducer, ReducerTable};
use crate::tree::StateValue;
use crate::vocabulary::Vocabulary;
use crate::ReducerResult;

/// The generated actions and the reducer that applies them.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Action identifiers in pre-order.
    pub actions: Vec<ActionId>,
    pub reducer: Reducer,
}

impl Generated {
    pub fn into_parts(self) -> (Vec<ActionId>, Reducer) {
        (self.actions, self.reducer)
    }
}

/// Generate actions and a reducer from the shape of `initial` with the
/// default config.
///
/// # Examples
///
/// ```
/// use tirea_reducer::{generate_from, StateValue, UpdateRequest};
/// use serde_json::json;
///
/// let (actions, reducer) = generate_from(json!({"a": 1, "b": 1})).unwrap().into_parts();
/// assert_eq!(actions, ["SET_A", "SET_B"]);
///
/// let state = StateValue::from(json!({"a": 2, "b": 4}));
/// let next = reducer.dispatch(&state, UpdateRequest::new("SET_A", 45));
/// assert_eq!(next, json!({"a": 45, "b": 4}));
/// ```
pub fn generate_from(initial: impl Into<StateValue>) -> ReducerResult<Generated> {
    generate_from_with(initial, ReducerConfig::default())
}

pub fn generate_from_with(
    initial: impl Into<StateValue>,
    config: ReducerConfig,
) -> ReducerResult<Generated> {
    let vocabulary = Vocabulary::generate(&initial.into(), &config)?;
    let reducer = Reducer::new(ReducerTable::build(&vocabulary, &config));
    Ok(Generated {
        actions: vocabulary.into_ids(),
        reducer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_actions_match_reducer_table() {
        let generated = generate_from(json!({"a": 1, "c": {"d": true}})).unwrap();
        assert_eq!(generated.actions, generated.reducer.actions());
        for id in &generated.actions {
            assert!(generated.reducer.contains(id.as_str()));
        }
    }

    #[test]
    fn test_config_is_carried_to_reducer() {
        let config = ReducerConfig::default().with_cloning(crate::CloneStrategy::PathCopy);
        let generated = generate_from_with(json!({"a": 1}), config.clone()).unwrap();
        assert_eq!(generated.reducer.config(), &config);
    }
}
