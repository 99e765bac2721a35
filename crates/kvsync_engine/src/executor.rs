//! Sequential batch submission.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::flatten::FlatEntry;
use crate::planner::{Batch, BatchPlanner};
use crate::summary::{BatchOutcome, ExecutionSummary};
use crate::transport::RemoteStore;
use kvsync_protocol::TransactionResult;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Submits planned batches to a remote store, one at a time.
///
/// Batch `i + 1` is never sent before the outcome of batch `i` is known,
/// so outcome indices match plan order on every run.
pub struct SyncExecutor<S: RemoteStore> {
    config: SyncConfig,
    store: S,
}

impl<S: RemoteStore> SyncExecutor<S> {
    /// Creates a new executor.
    pub fn new(config: SyncConfig, store: S) -> Self {
        Self { config, store }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a planner sized to the configured transaction capacity.
    pub fn planner(&self) -> SyncResult<BatchPlanner> {
        BatchPlanner::new(self.config.max_operations)
    }

    /// Plans the entries and executes the resulting batches.
    pub fn sync(&self, entries: &[FlatEntry]) -> SyncResult<ExecutionSummary> {
        let batches = self.planner()?.plan(entries);
        self.execute(&batches)
    }

    /// Executes batches in order.
    ///
    /// A rolled back batch is recorded and the run continues. A transport
    /// failure aborts the run with [`SyncError::Interrupted`]; the store's
    /// state for that batch is unknown.
    pub fn execute(&self, batches: &[Batch]) -> SyncResult<ExecutionSummary> {
        let start = Instant::now();
        let total_entries = batches.iter().map(Batch::len).sum();
        let mut summary = ExecutionSummary::new(total_entries, batches.len());

        info!(
            entries = total_entries,
            batches = batches.len(),
            "syncing key-value pairs"
        );

        for (index, batch) in batches.iter().enumerate() {
            debug!(
                batch = index + 1,
                of = batches.len(),
                operations = batch.len(),
                "submitting batch"
            );

            let result = self
                .store
                .submit_transaction(batch.operations())
                .map_err(|e| SyncError::Interrupted {
                    batch: index + 1,
                    committed_batches: summary.succeeded_batches,
                    source: Box::new(e),
                })?;

            let outcome = match result {
                TransactionResult::Committed => BatchOutcome::committed(index, batch.len()),
                TransactionResult::RolledBack(errors) => {
                    warn!(
                        batch = index + 1,
                        errors = errors.len(),
                        "transaction rolled back"
                    );
                    BatchOutcome::rolled_back(index, batch.len(), errors)
                }
            };
            summary.record(outcome);

            if index + 1 < batches.len() && !self.config.batch_delay.is_zero() {
                std::thread::sleep(self.config.batch_delay);
            }
        }

        info!(
            succeeded = summary.succeeded_batches,
            failed = summary.failed_batches,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "sync finished"
        );
        Ok(summary)
    }
}
