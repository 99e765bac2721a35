//! Check command implementation.

use crate::report::{format_duplicates, to_json, OutputFormat};
use kvsync_engine::detect;
use std::path::Path;

/// Runs the check command.
pub fn run(
    config: &Path,
    environment: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let sources = super::load_environment(config, environment)?;
    let duplicates = detect(&sources);

    match format {
        OutputFormat::Json => println!("{}", to_json(&duplicates)?),
        OutputFormat::Text if duplicates.is_empty() => {
            println!(
                "✓ No duplicate keys across {} file(s) in '{}'",
                sources.len(),
                environment
            );
        }
        OutputFormat::Text => eprintln!("{}", format_duplicates(&duplicates)),
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(format!("{} duplicate key(s) detected", duplicates.len()).into())
    }
}
