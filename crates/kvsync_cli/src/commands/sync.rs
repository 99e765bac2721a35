//! Sync command implementation.

use crate::client::ReqwestClient;
use crate::report::{write_sync_report, OutputFormat};
use kvsync_engine::{HttpStore, SyncConfig, SyncExecutor};
use std::path::Path;
use tracing::info;

/// Runs the sync command.
pub fn run(
    config_path: &Path,
    environment: &str,
    config: SyncConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let sources = super::load_environment(config_path, environment)?;
    let entries = super::merge_sources(&sources)?;

    info!(address = %config.address, datacenter = %config.datacenter, "connecting to store");
    let client = ReqwestClient::new(&config)?;
    let store = HttpStore::new(&config, client);
    let executor = SyncExecutor::new(config, store);

    info!(entries = entries.len(), "syncing key-value pairs to Consul KV store");
    let summary = executor.sync(&entries)?;

    let stdout = std::io::stdout();
    write_sync_report(&summary, format, stdout.lock())?;

    summary.ensure_success()?;
    Ok(())
}
