//! Dot-delimited key paths.
//!
//! A [`KeyPath`] is the structured form of a translation key such as
//! `welcome.title`. Segments are never empty. A literal `.` inside a key name
//! cannot be expressed; it always reads as nesting.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::error::Error;

/// Separator between path segments.
pub const DELIMITER: char = '.';

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// The empty path, which addresses the root of a tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Splits `path` on `.`.
    ///
    /// Fails with [`Error::InvalidPath`] when any segment is empty, which
    /// includes the empty string and leading, trailing or doubled dots.
    ///
    /// ```rust
    /// use langtable::path::KeyPath;
    /// let path = KeyPath::split("welcome.title").unwrap();
    /// assert_eq!(path.segments(), ["welcome", "title"]);
    /// assert!(KeyPath::split("welcome..title").is_err());
    /// ```
    pub fn split(path: &str) -> Result<Self, Error> {
        let segments: Vec<String> = path.split(DELIMITER).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::invalid_path(path));
        }
        Ok(Self { segments })
    }

    /// Joins the segments back with `.`.
    pub fn join(&self) -> String {
        self.segments.join(".")
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with the tree key `key` appended.
    ///
    /// A key containing `.` contributes one segment per piece, so it reads
    /// back as deeper nesting. A key that would leave an empty segment (`""`,
    /// `"Loading..."`) cannot survive a split and is rejected with the full
    /// dotted text.
    pub(crate) fn child(&self, key: &str) -> Result<Self, Error> {
        if key.split(DELIMITER).any(str::is_empty) {
            return Err(Error::invalid_path(qualify(&self.join(), key)));
        }
        let mut segments = self.segments.clone();
        segments.extend(key.split(DELIMITER).map(str::to_string));
        Ok(Self { segments })
    }

    /// Whether `self` is a strict prefix of `other`.
    pub fn is_strict_prefix_of(&self, other: &KeyPath) -> bool {
        self.len() < other.len() && other.segments.starts_with(&self.segments)
    }
}

/// Joins a file id (or any outer prefix) and a dotted key into the
/// `file.key` form used by view helpers such as `__('messages.welcome')`.
/// An empty prefix yields `key` unchanged.
pub fn qualify(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{DELIMITER}{key}")
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.join())
    }
}

impl FromStr for KeyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::split(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_nested_key() {
        let path = KeyPath::split("a.b.c").unwrap();
        assert_eq!(path.segments(), ["a", "b", "c"]);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_split_single_segment() {
        let path = KeyPath::split("welcome").unwrap();
        assert_eq!(path.segments(), ["welcome"]);
    }

    #[test]
    fn test_split_rejects_empty_segments() {
        for bad in ["", ".", "a.", ".a", "a..b"] {
            let err = KeyPath::split(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidPath(ref p) if p == bad), "{bad}");
        }
    }

    #[test]
    fn test_join_inverts_split() {
        let text = "auth.failed.throttle";
        assert_eq!(KeyPath::split(text).unwrap().join(), text);
        assert_eq!(text.parse::<KeyPath>().unwrap().to_string(), text);
    }

    #[test]
    fn test_child_splits_dotted_keys() {
        let path = KeyPath::split("welcome").unwrap();
        assert_eq!(path.child("title").unwrap().segments(), ["welcome", "title"]);
        assert_eq!(path.child("a.b").unwrap().segments(), ["welcome", "a", "b"]);
    }

    #[test]
    fn test_child_rejects_keys_with_empty_segments() {
        let path = KeyPath::split("status").unwrap();
        for (bad, shown) in [
            ("Loading...", "status.Loading..."),
            ("", "status."),
            (".hidden", "status..hidden"),
        ] {
            let err = path.child(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidPath(ref p) if p == shown), "{bad}");
        }
        assert!(matches!(
            KeyPath::root().child("a..b"),
            Err(Error::InvalidPath(ref p)) if p == "a..b"
        ));
    }

    #[test]
    fn test_strict_prefix() {
        let a = KeyPath::split("a").unwrap();
        let ab = KeyPath::split("a.b").unwrap();
        let ac = KeyPath::split("ac").unwrap();
        assert!(a.is_strict_prefix_of(&ab));
        assert!(!ab.is_strict_prefix_of(&a));
        assert!(!a.is_strict_prefix_of(&a));
        assert!(!a.is_strict_prefix_of(&ac));
    }

    #[test]
    fn test_qualify_with_file() {
        assert_eq!(qualify("messages", "welcome.title"), "messages.welcome.title");
        assert_eq!(qualify("", "welcome"), "welcome");
    }
}
