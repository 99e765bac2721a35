//! Flattening of nested mappings into `/`-joined key paths.

use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// A single leaf of a flattened mapping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FlatEntry {
    /// Separator-joined keys from the root to the leaf.
    pub path: String,
    /// Canonical text of the leaf value.
    pub value: String,
}

impl FlatEntry {
    /// Creates a new flat entry.
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Flattens a nested mapping into one entry per leaf.
///
/// Nested mappings are recursed into and never emitted; an empty mapping
/// contributes no entries. A root that is not a mapping has no keys and
/// yields nothing. Callers must not rely on the output order.
pub fn flatten(root: &Value) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    if let Value::Map(map) = root {
        flatten_into(map, "", &mut entries);
    }
    entries
}

fn flatten_into(map: &BTreeMap<String, Value>, prefix: &str, out: &mut Vec<FlatEntry>) {
    for (key, value) in map {
        let path = join_path(prefix, key);
        match value {
            Value::Map(nested) => flatten_into(nested, &path, out),
            leaf => out.push(FlatEntry {
                path,
                value: leaf.render(),
            }),
        }
    }
}

/// Joins a prefix and a key with the path separator.
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut entries: Vec<FlatEntry>) -> Vec<FlatEntry> {
        entries.sort();
        entries
    }

    #[test]
    fn flatten_nested_mapping() {
        let root = Value::map([(
            "app",
            Value::map([
                ("name", Value::from("x")),
                ("version", Value::from("1.0")),
            ]),
        )]);

        assert_eq!(
            sorted(flatten(&root)),
            vec![
                FlatEntry::new("app/name", "x"),
                FlatEntry::new("app/version", "1.0"),
            ]
        );
    }

    #[test]
    fn flatten_renders_scalars() {
        let root = Value::map([
            ("port", Value::from(5432i64)),
            ("ratio", Value::from(0.25)),
            ("enabled", Value::from(false)),
            ("missing", Value::Null),
            ("hosts", Value::List(vec![Value::from("a"), Value::from("b")])),
        ]);

        assert_eq!(
            sorted(flatten(&root)),
            vec![
                FlatEntry::new("enabled", "false"),
                FlatEntry::new("hosts", "[a b]"),
                FlatEntry::new("missing", "<nil>"),
                FlatEntry::new("port", "5432"),
                FlatEntry::new("ratio", "0.25"),
            ]
        );
    }

    #[test]
    fn empty_mapping_has_no_leaves() {
        let root = Value::map([
            ("empty", Value::empty_map()),
            ("deep", Value::map([("empty", Value::empty_map())])),
            ("leaf", Value::from("v")),
        ]);

        assert_eq!(flatten(&root), vec![FlatEntry::new("leaf", "v")]);
        assert!(flatten(&Value::empty_map()).is_empty());
    }

    #[test]
    fn non_map_root_yields_nothing() {
        assert!(flatten(&Value::from("scalar")).is_empty());
        assert!(flatten(&Value::Null).is_empty());
    }

    #[test]
    fn leaf_count_independent_of_depth() {
        let mut root = Value::from("leaf");
        for depth in 0..10 {
            root = Value::map([(format!("level{}", depth), root)]);
        }
        let entries = flatten(&root);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path.matches(PATH_SEPARATOR).count(), 9);
        assert!(entries[0].path.starts_with("level9/level8"));
    }

    #[test]
    fn join_path_root() {
        assert_eq!(join_path("", "a"), "a");
        assert_eq!(join_path("a/b", "c"), "a/b/c");
    }
}
