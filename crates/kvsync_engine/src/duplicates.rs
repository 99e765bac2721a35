//! Cross-source duplicate key detection.
//!
//! Every path may be defined by at most one source. Detection runs before
//! anything is sent to the store; any duplicate stops the run.

use crate::error::{SyncError, SyncResult};
use crate::flatten::{flatten, FlatEntry};
use crate::value::Value;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// One loaded configuration source.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Source identifier (e.g. the file name).
    pub id: String,
    /// Root mapping of the source.
    pub root: Value,
}

impl Source {
    /// Creates a new source.
    pub fn new(id: impl Into<String>, root: Value) -> Self {
        Self {
            id: id.into(),
            root,
        }
    }
}

/// A flat entry tagged with the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Entry path.
    pub path: String,
    /// Entry value.
    pub value: String,
    /// Identifier of the defining source.
    pub source_id: String,
}

/// Flattens one source and stamps its identifier on every entry.
pub fn source_entries(source: &Source) -> Vec<SourceEntry> {
    stamp(&source.root, &source.id)
}

fn stamp(root: &Value, source_id: &str) -> Vec<SourceEntry> {
    flatten(root)
        .into_iter()
        .map(|entry| SourceEntry {
            path: entry.path,
            value: entry.value,
            source_id: source_id.to_string(),
        })
        .collect()
}

/// A source and the value it assigns to a duplicated path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Identifier of the defining source.
    pub source_id: String,
    /// Value assigned by that source.
    pub value: String,
}

/// A path defined by two or more sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    /// Duplicated path.
    pub path: String,
    /// Every definition, in source-processing order.
    pub occurrences: Vec<Occurrence>,
}

impl DuplicateRecord {
    /// Returns the identifiers of the conflicting sources.
    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.occurrences.iter().map(|o| o.source_id.as_str())
    }
}

/// Detects paths defined by more than one mapping.
///
/// `mappings[i]` is attributed to `source_ids[i]`. The result is sorted by
/// path.
pub fn detect_duplicates<S: AsRef<str>>(
    mappings: &[Value],
    source_ids: &[S],
) -> SyncResult<Vec<DuplicateRecord>> {
    if mappings.len() != source_ids.len() {
        return Err(SyncError::ArityMismatch {
            mappings: mappings.len(),
            source_ids: source_ids.len(),
        });
    }

    Ok(collect_duplicates(
        mappings
            .iter()
            .zip(source_ids)
            .flat_map(|(root, id)| stamp(root, id.as_ref())),
    ))
}

/// Detects paths defined by more than one source.
pub fn detect(sources: &[Source]) -> Vec<DuplicateRecord> {
    collect_duplicates(sources.iter().flat_map(source_entries))
}

fn collect_duplicates(entries: impl Iterator<Item = SourceEntry>) -> Vec<DuplicateRecord> {
    let mut tracker: HashMap<String, Vec<Occurrence>> = HashMap::new();

    for entry in entries {
        tracker.entry(entry.path).or_default().push(Occurrence {
            source_id: entry.source_id,
            value: entry.value,
        });
    }

    let mut duplicates: Vec<DuplicateRecord> = tracker
        .into_iter()
        .filter(|(_, occurrences)| occurrences.len() > 1)
        .map(|(path, occurrences)| DuplicateRecord { path, occurrences })
        .collect();

    duplicates.sort_by(|a, b| a.path.cmp(&b.path));
    duplicates
}

/// Checks the sources for duplicates and merges them into one entry list.
///
/// The merged entries are sorted by path so batch composition does not
/// depend on source or map iteration order.
pub fn prepare(sources: &[Source]) -> SyncResult<Vec<FlatEntry>> {
    let duplicates = detect(sources);
    if !duplicates.is_empty() {
        return Err(SyncError::DuplicateKeys(duplicates));
    }

    let mut entries: Vec<FlatEntry> = sources.iter().flat_map(|s| flatten(&s.root)).collect();
    entries.sort();

    debug!(
        sources = sources.len(),
        entries = entries.len(),
        "merged sources"
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence(source_id: &str, value: &str) -> Occurrence {
        Occurrence {
            source_id: source_id.into(),
            value: value.into(),
        }
    }

    #[test]
    fn single_duplicate() {
        let mappings = vec![
            Value::map([("a", Value::from(1i64))]),
            Value::map([("a", Value::from(2i64))]),
        ];

        let duplicates = detect_duplicates(&mappings, &["f1", "f2"]).unwrap();
        assert_eq!(
            duplicates,
            vec![DuplicateRecord {
                path: "a".into(),
                occurrences: vec![occurrence("f1", "1"), occurrence("f2", "2")],
            }]
        );
    }

    #[test]
    fn arity_mismatch() {
        let mappings = vec![Value::empty_map(), Value::empty_map()];
        let result = detect_duplicates(&mappings, &["only-one"]);
        assert!(matches!(
            result,
            Err(SyncError::ArityMismatch {
                mappings: 2,
                source_ids: 1
            })
        ));
    }

    #[test]
    fn no_duplicates_across_distinct_paths() {
        let sources = vec![
            Source::new("db.yaml", Value::map([("db", Value::map([("host", Value::from("h"))]))])),
            Source::new("db2.yaml", Value::map([("db", Value::map([("port", Value::from(1i64))]))])),
        ];
        assert!(detect(&sources).is_empty());
    }

    #[test]
    fn duplicates_sorted_by_path() {
        let sources = vec![
            Source::new("a.yaml", Value::map([("z", Value::from("1")), ("b", Value::from("1"))])),
            Source::new("b.yaml", Value::map([("z", Value::from("2")), ("b", Value::from("2"))])),
            Source::new("c.yaml", Value::map([("z", Value::from("3"))])),
        ];

        let duplicates = detect(&sources);
        let paths: Vec<_> = duplicates.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["b", "z"]);
        assert_eq!(
            duplicates[1].source_ids().collect::<Vec<_>>(),
            vec!["a.yaml", "b.yaml", "c.yaml"]
        );
    }

    #[test]
    fn same_value_is_still_a_duplicate() {
        let sources = vec![
            Source::new("a.yaml", Value::map([("k", Value::from("same"))])),
            Source::new("b.yaml", Value::map([("k", Value::from("same"))])),
        ];
        assert_eq!(detect(&sources).len(), 1);
    }

    #[test]
    fn null_leaves_participate() {
        let sources = vec![
            Source::new("a.yaml", Value::map([("k", Value::Null)])),
            Source::new("b.yaml", Value::map([("k", Value::from("set"))])),
        ];
        let duplicates = detect(&sources);
        assert_eq!(duplicates[0].occurrences[0], occurrence("a.yaml", "<nil>"));
    }

    #[test]
    fn prepare_merges_sorted() {
        let sources = vec![
            Source::new("b.yaml", Value::map([("zeta", Value::from("1"))])),
            Source::new("a.yaml", Value::map([("alpha", Value::from("2"))])),
        ];
        let entries = prepare(&sources).unwrap();
        assert_eq!(
            entries,
            vec![FlatEntry::new("alpha", "2"), FlatEntry::new("zeta", "1")]
        );
    }

    #[test]
    fn prepare_stops_on_duplicates() {
        let sources = vec![
            Source::new("a.yaml", Value::map([("k", Value::from("1"))])),
            Source::new("b.yaml", Value::map([("k", Value::from("2"))])),
        ];
        match prepare(&sources) {
            Err(SyncError::DuplicateKeys(records)) => assert_eq!(records[0].path, "k"),
            other => panic!("expected duplicate keys, got {:?}", other),
        }
    }

    #[test]
    fn source_entries_are_stamped() {
        let source = Source::new("app.yaml", Value::map([("a", Value::from("1"))]));
        let entries = source_entries(&source);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source_id, "app.yaml");
    }
}
