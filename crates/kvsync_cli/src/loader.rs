//! YAML source loading.

use crate::error::SourceError;
use kvsync_engine::{Source, Value};
use serde_yaml::Value as Yaml;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads every file as a source, in order.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<Source>, SourceError> {
    paths.iter().map(|path| load_source(path)).collect()
}

/// Loads one YAML file as a source identified by its base name.
pub fn load_source(path: &Path) -> Result<Source, SourceError> {
    let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let root = parse_document(path, &text)?;

    let id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(source = %id, path = %path.display(), "loaded source");
    Ok(Source::new(id, root))
}

/// Parses a YAML document into a root mapping.
///
/// An empty document is an empty mapping. Merge keys (`<<`) are expanded.
pub fn parse_document(path: &Path, text: &str) -> Result<Value, SourceError> {
    let parse_error = |source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut doc: Yaml = serde_yaml::from_str(text).map_err(parse_error)?;
    doc.apply_merge().map_err(parse_error)?;

    let doc = match doc {
        Yaml::Tagged(tagged) => tagged.value,
        other => other,
    };

    match doc {
        Yaml::Null => Ok(Value::empty_map()),
        mapping @ Yaml::Mapping(_) => Ok(convert(mapping, path)),
        _ => Err(SourceError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

fn convert(yaml: Yaml, path: &Path) -> Value {
    match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if n.is_u64() {
                // Beyond i64; keep the exact digits.
                Value::Text(n.to_string())
            } else {
                n.as_f64()
                    .map(Value::Float)
                    .unwrap_or_else(|| Value::Text(n.to_string()))
            }
        }
        Yaml::String(s) => Value::Text(s),
        Yaml::Sequence(items) => {
            Value::List(items.into_iter().map(|item| convert(item, path)).collect())
        }
        Yaml::Mapping(mapping) => {
            let mut map = BTreeMap::new();
            for (key, value) in mapping {
                let Some(key) = coerce_key(&key) else {
                    warn!(file = %path.display(), key = ?key, "dropping non-scalar mapping key");
                    continue;
                };
                if map.contains_key(&key) {
                    warn!(file = %path.display(), key = %key, "dropping key that collides after coercion");
                    continue;
                }
                map.insert(key, convert(value, path));
            }
            Value::Map(map)
        }
        Yaml::Tagged(tagged) => convert(tagged.value, path),
    }
}

/// Converts a mapping key to a string when it is unambiguously string-like.
fn coerce_key(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Tagged(tagged) => coerce_key(&tagged.value),
        Yaml::Null | Yaml::Sequence(_) | Yaml::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvsync_engine::{flatten, FlatEntry};

    fn parse(text: &str) -> Value {
        parse_document(Path::new("test.yaml"), text).unwrap()
    }

    fn flat(text: &str) -> Vec<FlatEntry> {
        let mut entries = flatten(&parse(text));
        entries.sort();
        entries
    }

    #[test]
    fn nested_document() {
        let entries = flat("app:\n  name: x\n  version: \"1.0\"\n");
        assert_eq!(
            entries,
            vec![
                FlatEntry::new("app/name", "x"),
                FlatEntry::new("app/version", "1.0"),
            ]
        );
    }

    #[test]
    fn scalar_types() {
        let entries = flat("int: 3\nfloat: 1.5\nbool: yes_string\nflag: true\nnothing: ~\nlist: [a, 2]\n");
        assert_eq!(
            entries,
            vec![
                FlatEntry::new("bool", "yes_string"),
                FlatEntry::new("flag", "true"),
                FlatEntry::new("float", "1.5"),
                FlatEntry::new("int", "3"),
                FlatEntry::new("list", "[a 2]"),
                FlatEntry::new("nothing", "<nil>"),
            ]
        );
    }

    #[test]
    fn non_string_keys_are_coerced() {
        let entries = flat("ports:\n  80: http\n  443: https\ntrue: yes\n");
        assert_eq!(
            entries,
            vec![
                FlatEntry::new("ports/443", "https"),
                FlatEntry::new("ports/80", "http"),
                FlatEntry::new("true", "yes"),
            ]
        );
    }

    #[test]
    fn complex_keys_are_dropped_alone() {
        let entries = flat("? [a, b]\n: dropped\nkept: value\n~: also-dropped\n");
        assert_eq!(entries, vec![FlatEntry::new("kept", "value")]);
    }

    #[test]
    fn colliding_coerced_key_keeps_first() {
        let entries = flat("\"1\": text\n1: number\n");
        assert_eq!(entries, vec![FlatEntry::new("1", "text")]);
    }

    #[test]
    fn merge_keys_expand() {
        let entries = flat("base: &base\n  timeout: 5\nservice:\n  <<: *base\n  name: api\n");
        assert!(entries.contains(&FlatEntry::new("service/timeout", "5")));
        assert!(entries.contains(&FlatEntry::new("service/name", "api")));
    }

    #[test]
    fn empty_document_is_empty_mapping() {
        assert_eq!(parse(""), Value::empty_map());
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        let result = parse_document(Path::new("list.yaml"), "- a\n- b\n");
        assert!(matches!(result, Err(SourceError::NotAMapping { .. })));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result = parse_document(Path::new("bad.yaml"), "a: [unclosed\n");
        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }

    #[test]
    fn source_id_is_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("common.yaml");
        fs::write(&path, "a: 1\n").unwrap();

        let sources = load_sources(&[path]).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, "common.yaml");
        assert_eq!(flatten(&sources[0].root), vec![FlatEntry::new("a", "1")]);
    }

    #[test]
    fn missing_file_fails() {
        let result = load_source(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(SourceError::Read { .. })));
    }
}
