//! Property-based test generators using proptest.
//!
//! Keys never contain the path separator, so flattened paths are
//! injective over generated trees.

use kvsync_engine::{FlatEntry, Source, Value};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Strategy for generating mapping keys.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,7}").expect("Invalid regex")
}

/// Strategy for generating scalar leaves.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        prop::string::string_regex("[a-zA-Z0-9 ._-]{0,12}")
            .expect("Invalid regex")
            .prop_map(Value::Text),
    ]
}

/// Strategy for generating leaves, including short lists of scalars.
pub fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => scalar_strategy(),
        1 => prop::collection::vec(scalar_strategy(), 0..4).prop_map(Value::List),
    ]
}

/// Strategy for generating any value, nesting mappings up to `depth` levels.
pub fn value_strategy(depth: u32) -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(depth, 64, 5, |inner| {
        prop::collection::btree_map(key_strategy(), inner, 0..5).prop_map(Value::Map)
    })
}

/// Strategy for generating a document root, which is always a mapping.
pub fn tree_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(key_strategy(), value_strategy(3), 0..6).prop_map(Value::Map)
}

/// Strategy for generating sources that never share a path.
///
/// Each source is nested under its own top-level key.
pub fn disjoint_sources_strategy(max_sources: usize) -> impl Strategy<Value = Vec<Source>> {
    prop::collection::vec(tree_strategy(), 1..=max_sources).prop_map(|trees| {
        trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| {
                let mut root = BTreeMap::new();
                root.insert(format!("s{}", i), tree);
                Source::new(format!("source-{}.yaml", i), Value::Map(root))
            })
            .collect()
    })
}

/// Strategy for generating flat entries with unique paths, in path order.
pub fn flat_entries_strategy(max_entries: usize) -> impl Strategy<Value = Vec<FlatEntry>> {
    prop::collection::btree_map(
        prop::string::string_regex("[a-z]{1,6}(/[a-z]{1,6}){0,2}").expect("Invalid regex"),
        prop::string::string_regex("[a-z0-9]{0,8}").expect("Invalid regex"),
        0..max_entries,
    )
    .prop_map(|map| {
        map.into_iter()
            .map(|(path, value)| FlatEntry::new(path, value))
            .collect()
    })
}

/// Counts the leaves a mapping flattens to.
pub fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Map(map) => map
            .values()
            .map(|v| match v {
                Value::Map(_) => count_leaves(v),
                _ => 1,
            })
            .sum(),
        _ => 0,
    }
}

/// Looks up a leaf by its flattened path.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(kvsync_engine::PATH_SEPARATOR)
        .try_fold(root, |node, segment| node.as_map()?.get(segment))
}
