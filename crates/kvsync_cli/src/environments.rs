//! Environment definitions.
//!
//! The environments file maps each environment name to the list of source
//! files that make it up:
//!
//! ```yaml
//! production:
//!   - common.yaml
//!   - production.yaml
//! ```

use crate::error::SourceError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory, next to the environments file, holding relative source files.
pub const KV_FILES_DIR: &str = "kv-files";

/// Parsed environments file.
#[derive(Debug, Clone)]
pub struct Environments {
    path: PathBuf,
    entries: BTreeMap<String, Vec<String>>,
}

impl Environments {
    /// Loads and parses an environments file.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parses environments from YAML text read from `path`.
    pub fn parse(path: &Path, text: &str) -> Result<Self, SourceError> {
        let raw: Option<BTreeMap<String, Option<Vec<String>>>> =
            serde_yaml::from_str(text).map_err(|source| SourceError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let entries: BTreeMap<String, Vec<String>> = raw
            .unwrap_or_default()
            .into_iter()
            .map(|(name, files)| (name, files.unwrap_or_default()))
            .collect();

        if entries.is_empty() {
            return Err(SourceError::NoEnvironments {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Returns the environment names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the files listed for an environment.
    pub fn files(&self, name: &str) -> Result<&[String], SourceError> {
        let files = self
            .entries
            .get(name)
            .ok_or_else(|| SourceError::UnknownEnvironment {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })?;

        if files.is_empty() {
            return Err(SourceError::NoFiles(name.to_string()));
        }
        Ok(files)
    }

    /// Returns the resolved paths of an environment's files.
    pub fn resolve(&self, name: &str) -> Result<Vec<PathBuf>, SourceError> {
        Ok(resolve_file_paths(&self.path, self.files(name)?))
    }
}

/// Resolves source file names against the environments file location.
///
/// Absolute names are kept; relative names live under [`KV_FILES_DIR`] next
/// to the environments file.
pub fn resolve_file_paths(config_path: &Path, files: &[String]) -> Vec<PathBuf> {
    let config_dir = config_path.parent().unwrap_or_else(|| Path::new(""));

    files
        .iter()
        .map(|file| {
            let path = Path::new(file);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                config_dir.join(KV_FILES_DIR).join(path)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
production:
  - common.yaml
  - production.yaml
staging:
  - common.yaml
  - staging.yaml
empty:
";

    fn sample() -> Environments {
        Environments::parse(Path::new("/etc/kvsync/environments.yaml"), SAMPLE).unwrap()
    }

    #[test]
    fn names_are_sorted() {
        let envs = sample();
        assert_eq!(
            envs.names().collect::<Vec<_>>(),
            vec!["empty", "production", "staging"]
        );
    }

    #[test]
    fn resolves_relative_to_kv_files() {
        let paths = sample().resolve("staging").unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/etc/kvsync/kv-files/common.yaml"),
                PathBuf::from("/etc/kvsync/kv-files/staging.yaml"),
            ]
        );
    }

    #[test]
    fn absolute_paths_kept() {
        let paths = resolve_file_paths(
            Path::new("environments.yaml"),
            &["/abs/app.yaml".to_string(), "rel.yaml".to_string()],
        );
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/abs/app.yaml"),
                PathBuf::from("kv-files/rel.yaml"),
            ]
        );
    }

    #[test]
    fn unknown_environment() {
        match sample().files("qa") {
            Err(SourceError::UnknownEnvironment { name, available }) => {
                assert_eq!(name, "qa");
                assert_eq!(available, vec!["empty", "production", "staging"]);
            }
            other => panic!("expected unknown environment, got {:?}", other),
        }
    }

    #[test]
    fn environment_without_files() {
        assert!(matches!(
            sample().files("empty"),
            Err(SourceError::NoFiles(name)) if name == "empty"
        ));
    }

    #[test]
    fn empty_file_has_no_environments() {
        let result = Environments::parse(Path::new("environments.yaml"), "");
        assert!(matches!(result, Err(SourceError::NoEnvironments { .. })));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("environments.yaml");
        fs::write(&path, SAMPLE).unwrap();

        let envs = Environments::load(&path).unwrap();
        assert_eq!(envs.files("production").unwrap().len(), 2);

        let missing = Environments::load(&dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(SourceError::Read { .. })));
    }
}
