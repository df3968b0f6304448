//! Nested translation trees.
//!
//! A [`Tree`] is what one language file holds: branches keyed by segment,
//! with string leaves. This module owns the three structural operations the
//! rest of the crate is built on:
//!
//! - [`Tree::insert`] places one value at a path, creating branches on the way.
//! - [`merge_trees`] overlays one tree on another without dropping base keys.
//! - [`Tree::flatten`] / [`unflatten`] convert to and from `path → value` maps.
//!
//! Leaf/branch clashes resolve as "last write wins" everywhere: a leaf that
//! sits where a branch is needed is replaced by a branch and its value is lost,
//! and a branch that receives a leaf is replaced wholesale. This is silent by
//! contract and never an error.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::Error,
    path::{KeyPath, qualify},
};

/// Ordered `path → value` mapping produced by flattening.
pub type FlatMap = IndexMap<KeyPath, String>;

/// Serializes as the JSON a language file holds: branches as objects, leaves
/// as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Tree {
    Leaf(String),
    Branch(IndexMap<String, Tree>),
}

impl Default for Tree {
    fn default() -> Self {
        Tree::empty()
    }
}

impl Tree {
    /// An empty branch; what a missing language file loads as.
    pub fn empty() -> Self {
        Tree::Branch(IndexMap::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Tree::Branch(children) if children.is_empty())
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Tree::Leaf(value) => Some(value),
            Tree::Branch(_) => None,
        }
    }

    /// Looks up the node at `path`.
    pub fn get(&self, path: &KeyPath) -> Option<&Tree> {
        let mut node = self;
        for segment in path.segments() {
            match node {
                Tree::Branch(children) => node = children.get(segment)?,
                Tree::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Number of leaves reachable from this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Tree::Leaf(_) => 1,
            Tree::Branch(children) => children.values().map(Tree::leaf_count).sum(),
        }
    }

    /// Sets the leaf at `path` to `value`, creating branches as needed.
    ///
    /// An intermediate leaf is replaced by an empty branch before descending,
    /// losing its value. An empty `path` replaces the whole tree.
    pub fn insert(&mut self, path: &KeyPath, value: impl Into<String>) {
        let mut node = self;
        for segment in path.segments() {
            if !matches!(node, Tree::Branch(_)) {
                *node = Tree::empty();
            }
            let Tree::Branch(children) = node else {
                unreachable!("node was just made a branch");
            };
            node = children.entry(segment.clone()).or_insert_with(Tree::empty);
        }
        *node = Tree::Leaf(value.into());
    }

    /// Flattens the tree into `path → value` pairs, each path starting with
    /// `prefix`. Empty branches produce nothing; so does a bare root leaf
    /// under an empty prefix, since it has no path.
    ///
    /// Every key must split into non-empty segments; the first one that does
    /// not (`""`, `"Loading..."`) is an [`Error::InvalidPath`].
    pub fn flatten(&self, prefix: &KeyPath) -> Result<FlatMap, Error> {
        let mut out = FlatMap::new();
        self.flatten_into(prefix, &mut out)?;
        Ok(out)
    }

    fn flatten_into(&self, prefix: &KeyPath, out: &mut FlatMap) -> Result<(), Error> {
        match self {
            Tree::Leaf(value) => {
                if !prefix.is_empty() {
                    out.insert(prefix.clone(), value.clone());
                }
            }
            Tree::Branch(children) => {
                for (key, child) in children {
                    child.flatten_into(&prefix.child(key)?, out)?;
                }
            }
        }
        Ok(())
    }

    /// Converts a JSON document into a tree.
    ///
    /// Objects become branches and strings become leaves. Anything else is a
    /// [`Error::ValueTypeError`] naming the offending path.
    pub fn from_json(value: Value) -> Result<Self, Error> {
        Self::from_json_at(value, "")
    }

    fn from_json_at(value: Value, at: &str) -> Result<Self, Error> {
        match value {
            Value::String(s) => Ok(Tree::Leaf(s)),
            Value::Object(map) => {
                let mut children = IndexMap::with_capacity(map.len());
                for (key, child) in map {
                    let path = qualify(at, &key);
                    children.insert(key, Self::from_json_at(child, &path)?);
                }
                Ok(Tree::Branch(children))
            }
            other => Err(Error::value_type(at, json_kind(&other))),
        }
    }

}

/// Name of a JSON value's type for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Builds a tree from `path → value` pairs, in order.
///
/// When one path is a strict prefix of another, whichever pair comes later
/// decides the node: a longer path turns an earlier leaf into a branch, a
/// shorter path turns an earlier branch into a leaf.
pub fn unflatten<'a, I>(pairs: I) -> Tree
where
    I: IntoIterator<Item = (&'a KeyPath, &'a String)>,
{
    let mut tree = Tree::empty();
    for (path, value) in pairs {
        tree.insert(path, value.as_str());
    }
    tree
}

/// Overlays `overlay` on `base`.
///
/// Keys present on both sides recurse when both values are branches;
/// otherwise the overlay's value replaces the base's. Base keys absent from
/// the overlay are kept. An empty overlay leaves `base` untouched, and an
/// empty base yields `overlay`.
///
/// Only the root gets that identity: below it, an empty branch is an ordinary
/// branch value, so `{"a": {}}` replaces a leaf at `a`.
pub fn merge_trees(base: Tree, overlay: Tree) -> Tree {
    if overlay.is_empty() {
        return base;
    }
    merge_nodes(base, overlay)
}

fn merge_nodes(base: Tree, overlay: Tree) -> Tree {
    match (base, overlay) {
        (Tree::Branch(mut base_children), Tree::Branch(overlay_children)) => {
            for (key, overlay_child) in overlay_children {
                match base_children.get_mut(&key) {
                    Some(slot) => {
                        let base_child = std::mem::take(slot);
                        *slot = merge_nodes(base_child, overlay_child);
                    }
                    None => {
                        base_children.insert(key, overlay_child);
                    }
                }
            }
            Tree::Branch(base_children)
        }
        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(s: &str) -> KeyPath {
        KeyPath::split(s).unwrap()
    }

    fn tree(value: Value) -> Tree {
        Tree::from_json(value).unwrap()
    }

    #[test]
    fn test_insert_creates_branches() {
        let mut t = Tree::empty();
        t.insert(&p("a.b.c"), "X");
        assert_eq!(t, tree(json!({"a": {"b": {"c": "X"}}})));
    }

    #[test]
    fn test_insert_overwrites_same_path() {
        let mut t = Tree::empty();
        t.insert(&p("a.b"), "v1");
        t.insert(&p("a.b"), "v2");
        assert_eq!(t, tree(json!({"a": {"b": "v2"}})));
        assert_eq!(t.leaf_count(), 1);
    }

    #[test]
    fn test_insert_replaces_intermediate_leaf() {
        let mut t = tree(json!({"a": "OLD", "z": "KEEP"}));
        t.insert(&p("a.b"), "NEW");
        assert_eq!(t, tree(json!({"a": {"b": "NEW"}, "z": "KEEP"})));
    }

    #[test]
    fn test_insert_leaf_over_branch() {
        let mut t = tree(json!({"a": {"b": "x", "c": "y"}}));
        t.insert(&p("a"), "flat");
        assert_eq!(t, tree(json!({"a": "flat"})));
    }

    #[test]
    fn test_insert_into_root_leaf() {
        let mut t = Tree::Leaf("root".to_string());
        t.insert(&p("a"), "x");
        assert_eq!(t, tree(json!({"a": "x"})));
    }

    #[test]
    fn test_get() {
        let t = tree(json!({"a": {"b": "x"}}));
        assert_eq!(t.get(&p("a.b")).and_then(Tree::as_leaf), Some("x"));
        assert!(t.get(&p("a.b.c")).is_none());
        assert!(t.get(&p("q")).is_none());
        assert_eq!(t.get(&KeyPath::root()), Some(&t));
    }

    #[test]
    fn test_flatten_nested() {
        let t = tree(json!({"welcome": {"title": "Hi", "body": "Text"}, "bye": "Bye"}));
        let flat = t.flatten(&KeyPath::root()).unwrap();
        let keys: Vec<String> = flat.keys().map(KeyPath::join).collect();
        assert_eq!(keys, ["welcome.title", "welcome.body", "bye"]);
        assert_eq!(flat[&p("welcome.title")], "Hi");
    }

    #[test]
    fn test_flatten_with_prefix() {
        let t = tree(json!({"title": "Hi"}));
        let flat = t.flatten(&p("messages")).unwrap();
        assert_eq!(flat.get(&p("messages.title")).map(String::as_str), Some("Hi"));
    }

    #[test]
    fn test_flatten_skips_empty_branches() {
        let t = tree(json!({"a": {}, "b": {"c": {}}, "d": "x"}));
        let flat = t.flatten(&KeyPath::root()).unwrap();
        assert_eq!(flat.len(), 1);
        assert!(Tree::empty().flatten(&KeyPath::root()).unwrap().is_empty());
        assert!(Tree::Leaf("x".into()).flatten(&KeyPath::root()).unwrap().is_empty());
    }

    #[test]
    fn test_flatten_rejects_keys_that_cannot_be_split() {
        let t = tree(json!({"status": {"ok": "fine", "Loading...": "Loading..."}}));
        match t.flatten(&KeyPath::root()).unwrap_err() {
            Error::InvalidPath(path) => assert_eq!(path, "status.Loading..."),
            other => panic!("unexpected error: {other}"),
        }
        assert!(tree(json!({"": "blank"})).flatten(&KeyPath::root()).is_err());
    }

    #[test]
    fn test_flatten_dotted_key_reads_as_nesting() {
        let t = tree(json!({"a.b": "x"}));
        let flat = t.flatten(&KeyPath::root()).unwrap();
        assert_eq!(flat.keys().next().unwrap().segments(), ["a", "b"]);
        assert_eq!(unflatten(&flat), tree(json!({"a": {"b": "x"}})));
    }

    #[test]
    fn test_unflatten_inverts_flatten() {
        let t = tree(json!({"a": {"b": "1", "c": {"d": "2"}}, "e": "3"}));
        let flat = t.flatten(&KeyPath::root()).unwrap();
        assert_eq!(unflatten(&flat), t);
    }

    #[test]
    fn test_unflatten_prefix_conflict_last_write_wins() {
        let mut flat = FlatMap::new();
        flat.insert(p("a"), "leaf".to_string());
        flat.insert(p("a.b"), "deeper".to_string());
        assert_eq!(unflatten(&flat), tree(json!({"a": {"b": "deeper"}})));

        let mut flat = FlatMap::new();
        flat.insert(p("a.b"), "deeper".to_string());
        flat.insert(p("a"), "leaf".to_string());
        assert_eq!(unflatten(&flat), tree(json!({"a": "leaf"})));
    }

    #[test]
    fn test_merge_keeps_unrelated_base_keys() {
        let base = tree(json!({"a": {"b": {"c": "OLD", "d": "KEEP"}}}));
        let overlay = tree(json!({"a": {"b": {"c": "X"}}}));
        assert_eq!(
            merge_trees(base, overlay),
            tree(json!({"a": {"b": {"c": "X", "d": "KEEP"}}}))
        );
    }

    #[test]
    fn test_merge_preserves_base_key_order() {
        let base = tree(json!({"first": "1", "second": {"x": "2"}, "third": "3"}));
        let overlay = tree(json!({"second": {"y": "4"}, "fourth": "5"}));
        let merged = merge_trees(base, overlay);
        let Tree::Branch(children) = &merged else {
            panic!("expected branch");
        };
        let keys: Vec<&str> = children.keys().map(String::as_str).collect();
        assert_eq!(keys, ["first", "second", "third", "fourth"]);
        assert_eq!(merged.get(&p("second.x")).and_then(Tree::as_leaf), Some("2"));
    }

    #[test]
    fn test_merge_overlay_wins_on_type_clash() {
        let base = tree(json!({"a": {"b": "x"}, "c": "leaf"}));
        let overlay = tree(json!({"a": "flat", "c": {"d": "deep"}}));
        assert_eq!(
            merge_trees(base, overlay),
            tree(json!({"a": "flat", "c": {"d": "deep"}}))
        );
    }

    #[test]
    fn test_merge_identity() {
        let t = tree(json!({"a": {"b": "x"}, "c": "y"}));
        assert_eq!(merge_trees(t.clone(), Tree::empty()), t);
        assert_eq!(merge_trees(Tree::empty(), t.clone()), t);
        let leaf = Tree::Leaf("x".into());
        assert_eq!(merge_trees(leaf.clone(), Tree::empty()), leaf);
        assert_eq!(merge_trees(Tree::empty(), leaf.clone()), leaf);
    }

    #[test]
    fn test_merge_nested_empty_branch_replaces_leaf() {
        let base = tree(json!({"a": "leaf", "b": {"c": "keep"}}));
        let overlay = tree(json!({"a": {}, "b": {}}));
        assert_eq!(
            merge_trees(base, overlay),
            tree(json!({"a": {}, "b": {"c": "keep"}}))
        );
    }

    #[test]
    fn test_from_json_rejects_non_strings() {
        let err = Tree::from_json(json!({"a": {"count": 3}})).unwrap_err();
        match err {
            Error::ValueTypeError { path, found } => {
                assert_eq!(path, "a.count");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            Tree::from_json(json!({"list": ["a"]})),
            Err(Error::ValueTypeError { .. })
        ));
    }

    #[test]
    fn test_serializes_back_to_the_same_json() {
        let value = json!({"z": "1", "a": {"m": "2", "b": "3"}});
        assert_eq!(serde_json::to_value(tree(value.clone())).unwrap(), value);
        assert_eq!(
            serde_json::to_string(&tree(value)).unwrap(),
            r#"{"z":"1","a":{"m":"2","b":"3"}}"#
        );
    }
}
