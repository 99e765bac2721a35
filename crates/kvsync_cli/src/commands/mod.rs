//! CLI command implementations.

pub mod check;
pub mod export;
pub mod plan;
pub mod sync;

use crate::environments::Environments;
use crate::loader::load_sources;
use crate::report::format_duplicates;
use kvsync_engine::{prepare, FlatEntry, Source, SyncError};
use std::path::Path;
use tracing::info;

/// Loads every source of an environment.
pub fn load_environment(
    config: &Path,
    environment: &str,
) -> Result<Vec<Source>, Box<dyn std::error::Error>> {
    info!(config = %config.display(), "loading environments");
    let environments = Environments::load(config)?;
    let paths = environments.resolve(environment)?;
    info!(environment, files = paths.len(), "loading source files");
    Ok(load_sources(&paths)?)
}

/// Checks the sources for duplicates and merges them.
///
/// Duplicates are reported on stderr.
pub fn merge_sources(sources: &[Source]) -> Result<Vec<FlatEntry>, Box<dyn std::error::Error>> {
    info!("checking for duplicate keys");
    match prepare(sources) {
        Ok(entries) => {
            info!(entries = entries.len(), "collected key-value pairs");
            Ok(entries)
        }
        Err(SyncError::DuplicateKeys(duplicates)) => {
            eprintln!("{}", format_duplicates(&duplicates));
            Err("duplicate keys detected".into())
        }
        Err(e) => Err(e.into()),
    }
}
