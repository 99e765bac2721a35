//! Per-batch outcomes and the run summary.

use crate::error::{SyncError, SyncResult};
use kvsync_protocol::OperationError;
use serde::Serialize;

/// Outcome of one submitted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Zero-based submission index.
    pub index: usize,
    /// Number of operations in the batch.
    pub operation_count: usize,
    /// Whether the store committed the batch.
    pub succeeded: bool,
    /// Why the batch failed.
    pub failure_reason: Option<String>,
    /// Store-provided per-operation errors.
    pub operation_errors: Vec<OperationError>,
}

impl BatchOutcome {
    /// Creates the outcome of a committed batch.
    pub fn committed(index: usize, operation_count: usize) -> Self {
        Self {
            index,
            operation_count,
            succeeded: true,
            failure_reason: None,
            operation_errors: Vec::new(),
        }
    }

    /// Creates the outcome of a rolled back batch.
    pub fn rolled_back(index: usize, operation_count: usize, errors: Vec<OperationError>) -> Self {
        Self {
            index,
            operation_count,
            succeeded: false,
            failure_reason: Some(format!(
                "transaction rolled back with {} errors",
                errors.len()
            )),
            operation_errors: errors,
        }
    }
}

/// Overall status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every batch committed.
    Success,
    /// Some batches committed, some were rolled back.
    PartialFailure,
    /// No batch committed.
    Failed,
}

/// Aggregate result of executing a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    /// Number of entries across all batches.
    pub total_entries: usize,
    /// Number of batches in the plan.
    pub total_batches: usize,
    /// Number of committed batches.
    pub succeeded_batches: usize,
    /// Number of rolled back batches.
    pub failed_batches: usize,
    /// One outcome per submitted batch, in submission order.
    pub outcomes: Vec<BatchOutcome>,
}

impl ExecutionSummary {
    pub(crate) fn new(total_entries: usize, total_batches: usize) -> Self {
        Self {
            total_entries,
            total_batches,
            succeeded_batches: 0,
            failed_batches: 0,
            outcomes: Vec::with_capacity(total_batches),
        }
    }

    pub(crate) fn record(&mut self, outcome: BatchOutcome) {
        if outcome.succeeded {
            self.succeeded_batches += 1;
        } else {
            self.failed_batches += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Returns the overall status.
    ///
    /// An empty run counts as a success.
    pub fn status(&self) -> RunStatus {
        if self.failed_batches == 0 {
            RunStatus::Success
        } else if self.succeeded_batches > 0 {
            RunStatus::PartialFailure
        } else {
            RunStatus::Failed
        }
    }

    /// Returns true if no batch failed.
    pub fn is_success(&self) -> bool {
        self.failed_batches == 0
    }

    /// Returns the outcomes of failed batches.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }

    /// Escalates failed batches to a run-level error.
    pub fn ensure_success(&self) -> SyncResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(SyncError::BatchesFailed {
                failed: self.failed_batches,
                total: self.total_batches,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_partitions_batches() {
        let mut summary = ExecutionSummary::new(5, 3);
        summary.record(BatchOutcome::committed(0, 2));
        summary.record(BatchOutcome::rolled_back(
            1,
            2,
            vec![OperationError::new(0, "denied")],
        ));
        summary.record(BatchOutcome::committed(2, 1));

        assert_eq!(summary.succeeded_batches, 2);
        assert_eq!(summary.failed_batches, 1);
        assert_eq!(summary.status(), RunStatus::PartialFailure);
        assert_eq!(summary.failures().count(), 1);
        assert!(matches!(
            summary.ensure_success(),
            Err(SyncError::BatchesFailed {
                failed: 1,
                total: 3
            })
        ));
    }

    #[test]
    fn rolled_back_reason() {
        let outcome = BatchOutcome::rolled_back(
            0,
            3,
            vec![OperationError::new(0, "a"), OperationError::new(2, "b")],
        );
        assert_eq!(
            outcome.failure_reason.as_deref(),
            Some("transaction rolled back with 2 errors")
        );
    }

    #[test]
    fn status_variants() {
        let empty = ExecutionSummary::new(0, 0);
        assert_eq!(empty.status(), RunStatus::Success);
        assert!(empty.ensure_success().is_ok());

        let mut failed = ExecutionSummary::new(1, 1);
        failed.record(BatchOutcome::rolled_back(0, 1, Vec::new()));
        assert_eq!(failed.status(), RunStatus::Failed);
    }

    #[test]
    fn serializes_for_export() {
        let mut summary = ExecutionSummary::new(1, 1);
        summary.record(BatchOutcome::committed(0, 1));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["succeeded_batches"], 1);
        assert_eq!(json["outcomes"][0]["succeeded"], true);
    }
}
