//! Conversion between property-name paths and flat action identifiers.
//!
//! An identifier is `SET_` followed by the path segments joined with `__`,
//! each segment transliterated from camelCase to UPPER_SNAKE_CASE:
//!
//! ```text
//! ["c"]                  -> SET_C
//! ["c", "innerValue"]    -> SET_C__INNER_VALUE
//! []                     -> SET_STATE
//! ```
//!
//! The transliteration only inverts cleanly for names made of ASCII letters.
//! [`is_supported_name`] and [`check_path`] tell the two apart; the
//! vocabulary generator uses them to refuse ambiguous shapes.

use crate::{Path, ReducerError, ReducerResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

const PREFIX: &str = "SET_";
const LEVEL_SEPARATOR: &str = "__";
const WHOLE_STATE: &str = "SET_STATE";

/// A flat identifier naming one update operation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    /// The identifier that replaces the entire state.
    #[inline]
    pub fn whole_state() -> Self {
        Self(WHOLE_STATE.to_owned())
    }

    /// Wrap an identifier string as-is, without checking its grammar.
    #[inline]
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_whole_state(&self) -> bool {
        self.0 == WHOLE_STATE
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ActionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ActionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ActionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ActionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Encode a path into its action identifier.
///
/// # Examples
///
/// ```
/// use tirea_reducer::{encode, path};
///
/// assert_eq!(encode(&path!("c", "innerValue")), "SET_C__INNER_VALUE");
/// assert_eq!(encode(&path!()), "SET_STATE");
/// ```
pub fn encode(path: &Path) -> ActionId {
    if path.is_empty() {
        return ActionId::whole_state();
    }

    let mut id = String::from(PREFIX);
    for (i, seg) in path.iter().enumerate() {
        if i > 0 {
            id.push_str(LEVEL_SEPARATOR);
        }
        push_upper_snake(&mut id, seg);
    }
    ActionId(id)
}

fn push_upper_snake(out: &mut String, name: &str) {
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
        }
        out.extend(ch.to_uppercase());
    }
}

/// Decode an action identifier back into a path.
///
/// Returns `None` when the identifier lacks the `SET_` prefix or contains an
/// empty segment. `SET_STATE` decodes to the empty path.
///
/// # Examples
///
/// ```
/// use tirea_reducer::{decode, path};
///
/// assert_eq!(decode("SET_C__INNER_VALUE"), Some(path!("c", "innerValue")));
/// assert_eq!(decode("SET_STATE"), Some(path!()));
/// assert_eq!(decode("RESET"), None);
/// ```
pub fn decode(id: &str) -> Option<Path> {
    let lowered = id.to_lowercase();
    let rest = lowered.strip_prefix("set_")?;

    let mut path = Path::root();
    for seg in rest.split(LEVEL_SEPARATOR) {
        if seg.is_empty() {
            return None;
        }
        path.push(snake_to_camel(seg));
    }

    if path.len() == 1 && path.first() == Some("state") {
        return Some(Path::root());
    }
    Some(path)
}

fn snake_to_camel(seg: &str) -> String {
    let mut out = String::with_capacity(seg.len());
    let mut chars = seg.chars();
    while let Some(ch) = chars.next() {
        if ch == '_' {
            match chars.next() {
                Some(next) => out.extend(next.to_uppercase()),
                None => out.push('_'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Whether a property name survives an encode/decode round-trip.
///
/// Supported names are non-empty and made of ASCII letters only. Digits and
/// underscores collide with the separator rules.
pub fn is_supported_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic())
}

/// Check every segment of a path, reporting the first unsupported name.
pub fn check_path(path: &Path) -> ReducerResult<()> {
    match path.iter().find(|seg| !is_supported_name(seg)) {
        Some(name) => Err(ReducerError::unsupported_name(path.clone(), name)),
        None => Ok(()),
    }
}

/// Whether `decode(encode(path)) == path` is guaranteed for this path.
///
/// The single-segment path `state` is excluded: it encodes to the reserved
/// whole-state identifier.
pub fn is_round_trip_safe(path: &Path) -> bool {
    check_path(path).is_ok() && !(path.len() == 1 && path.first() == Some("state"))
}
