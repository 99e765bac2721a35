//! Plan (dry run) command implementation.

use crate::report::{format_entries, format_plan};
use kvsync_engine::BatchPlanner;
use std::path::Path;

/// Runs the plan command. Nothing is sent to the store.
pub fn run(
    config: &Path,
    environment: &str,
    max_operations: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let sources = super::load_environment(config, environment)?;
    let entries = super::merge_sources(&sources)?;
    let batches = BatchPlanner::new(max_operations)?.plan(&entries);

    println!("\n[DRY RUN MODE] No changes will be made to Consul");
    println!("{}", format_entries(&entries));
    print!("{}", format_plan(&batches));
    Ok(())
}
