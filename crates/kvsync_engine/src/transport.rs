//! Remote store abstraction.

use crate::error::{SyncError, SyncResult};
use kvsync_protocol::{Operation, OperationError, TransactionResult};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A transactional key-value store.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, in-process, mock for testing, etc.).
pub trait RemoteStore: Send + Sync {
    /// Submits one transaction and blocks until its outcome is known.
    ///
    /// A rollback is a normal result. Errors mean the outcome is unknown.
    fn submit_transaction(&self, operations: &[Operation]) -> SyncResult<TransactionResult>;
}

impl<S: RemoteStore + ?Sized> RemoteStore for &S {
    fn submit_transaction(&self, operations: &[Operation]) -> SyncResult<TransactionResult> {
        (**self).submit_transaction(operations)
    }
}

/// A scripted store for testing.
///
/// Responses are consumed in submission order; once the script runs out
/// every transaction commits.
#[derive(Debug)]
pub struct MockStore {
    script: Mutex<VecDeque<SyncResult<TransactionResult>>>,
    submitted: Mutex<Vec<Vec<Operation>>>,
}

impl MockStore {
    /// Creates a new mock store that commits everything.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Queues a commit for the next unscripted submission.
    pub fn push_commit(&self) {
        self.script.lock().push_back(Ok(TransactionResult::Committed));
    }

    /// Queues a rollback for the next unscripted submission.
    pub fn push_rollback(&self, errors: Vec<OperationError>) {
        self.script
            .lock()
            .push_back(Ok(TransactionResult::RolledBack(errors)));
    }

    /// Queues a failure for the next unscripted submission.
    pub fn push_error(&self, error: SyncError) {
        self.script.lock().push_back(Err(error));
    }

    /// Returns every submitted transaction, in order.
    pub fn submitted(&self) -> Vec<Vec<Operation>> {
        self.submitted.lock().clone()
    }

    /// Returns the number of submitted transactions.
    pub fn submission_count(&self) -> usize {
        self.submitted.lock().len()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore for MockStore {
    fn submit_transaction(&self, operations: &[Operation]) -> SyncResult<TransactionResult> {
        self.submitted.lock().push(operations.to_vec());
        self.script
            .lock()
            .pop_front()
            .unwrap_or(Ok(TransactionResult::Committed))
    }
}
