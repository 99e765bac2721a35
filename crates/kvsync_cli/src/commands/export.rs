//! Export command implementation.

use crate::report::write_export;
use std::path::Path;

/// Runs the export command, writing Consul KV import JSON to stdout.
pub fn run(config: &Path, environment: &str) -> Result<(), Box<dyn std::error::Error>> {
    let sources = super::load_environment(config, environment)?;
    let entries = super::merge_sources(&sources)?;

    let stdout = std::io::stdout();
    write_export(&entries, stdout.lock())?;
    Ok(())
}
