//! Property-name paths into a state tree.
//!
//! A path is the explicit, ordered list of property names leading from the
//! root of a state tree to one of its properties. The empty path names the
//! whole state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of property names.
///
/// Arrays are never traversed, so every segment is an object key.
///
/// # Examples
///
/// ```
/// use tirea_reducer::Path;
///
/// let path = Path::root().key("settings").key("fontSize");
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.to_string(), "$.settings.fontSize");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<String>);

impl Path {
    /// Create an empty path (the whole state).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path from owned segments.
    #[inline]
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Append a segment and return self (builder pattern).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(k.into());
        self
    }

    /// Push a segment onto the path (mutating).
    #[inline]
    pub fn push(&mut self, k: impl Into<String>) {
        self.0.push(k.into());
    }

    /// Pop the last segment from the path.
    #[inline]
    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    /// Append a segment and return a new path (non-mutating builder).
    #[inline]
    pub fn child(&self, k: impl Into<String>) -> Path {
        let mut result = self.clone();
        result.0.push(k.into());
        result
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Check if this path is empty (whole state).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    #[inline]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Join this path with another path.
    pub fn join(&self, other: &Path) -> Path {
        let mut result = self.clone();
        result.0.extend(other.0.iter().cloned());
        result
    }

    /// Get the parent path (path without the last segment).
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            let mut p = self.clone();
            p.pop();
            Some(p)
        }
    }

    /// Check if this path is a prefix of another path.
    ///
    /// A path is a prefix of itself.
    #[inline]
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for seg in &self.0 {
            write!(f, ".{}", seg)?;
        }
        Ok(())
    }
}

impl FromIterator<String> for Path {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Path {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Path(iter.into_iter().map(str::to_owned).collect())
    }
}

impl IntoIterator for Path {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Construct a [`Path`] from a list of property names.
///
/// # Examples
///
/// ```
/// use tirea_reducer::path;
///
/// let p = path!("user", "profile", "displayName");
/// assert_eq!(p.len(), 3);
/// assert!(path!().is_empty());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($seg);
        )+
        p
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_construction() {
        let path = Path::root().key("user").key("name");
        assert_eq!(path.len(), 2);
        assert_eq!(&path[0], "user");
        assert_eq!(&path[1], "name");
    }

    #[test]
    fn test_path_display() {
        assert_eq!(path!("a", "innerValue").to_string(), "$.a.innerValue");
        assert_eq!(Path::root().to_string(), "$");
    }

    #[test]
    fn test_path_parent_and_prefix() {
        let path = path!("a", "b");
        let parent = path.parent().unwrap();
        assert_eq!(parent, path!("a"));
        assert!(parent.is_prefix_of(&path));
        assert!(!path.is_prefix_of(&parent));
        assert!(path.is_prefix_of(&path));
        assert!(Path::root().parent().is_none());
    }

    #[test]
    fn test_path_join_and_child() {
        let joined = path!("a").join(&path!("b", "c"));
        assert_eq!(joined, path!("a", "b", "c"));
        assert_eq!(path!("a").child("b"), path!("a", "b"));
    }

    #[test]
    fn test_path_serde_is_plain_array() {
        let path = path!("c", "d");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["c","d"]"#);
        let parsed: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(path, parsed);
    }
}
