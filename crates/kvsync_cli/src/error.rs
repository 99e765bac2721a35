//! Error types for source loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving environments and loading source files.
#[derive(Error, Debug)]
pub enum SourceError {
    /// A file could not be read.
    #[error("failed to read file {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file is not valid YAML.
    #[error("failed to parse YAML file {}: {source}", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A source file's top level is not a mapping.
    #[error("top level of {} is not a mapping", path.display())]
    NotAMapping {
        /// File path.
        path: PathBuf,
    },

    /// The environments file defines nothing.
    #[error("no environments defined in {}", path.display())]
    NoEnvironments {
        /// Environments file path.
        path: PathBuf,
    },

    /// The requested environment does not exist.
    #[error("environment '{name}' not found. Available environments: {}", available.join(", "))]
    UnknownEnvironment {
        /// Requested environment.
        name: String,
        /// Defined environments, sorted.
        available: Vec<String>,
    },

    /// The requested environment lists no files.
    #[error("no files defined for environment '{0}'")]
    NoFiles(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_environment_lists_available() {
        let err = SourceError::UnknownEnvironment {
            name: "qa".into(),
            available: vec!["production".into(), "staging".into()],
        };
        assert_eq!(
            err.to_string(),
            "environment 'qa' not found. Available environments: production, staging"
        );
    }

    #[test]
    fn read_error_names_file() {
        let err = SourceError::Read {
            path: PathBuf::from("kv-files/app.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("kv-files/app.yaml"));
    }
}
