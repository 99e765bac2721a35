//! Store operations and transaction outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verb of a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Unconditionally set the key to the given value.
    Set,
}

impl Verb {
    /// Returns the wire name of the verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Set => "set",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic mutation against the remote store.
///
/// The value is an opaque, binary-safe payload. It is base64 encoded only
/// when the operation is put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operation verb.
    pub verb: Verb,
    /// Remote key.
    pub path: String,
    /// Raw value bytes.
    pub value: Vec<u8>,
}

impl Operation {
    /// Creates a new `set` operation.
    pub fn set(path: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            verb: Verb::Set,
            path: path.into(),
            value: value.into(),
        }
    }

    /// Returns the size of the value in bytes.
    pub fn value_size(&self) -> usize {
        self.value.len()
    }
}

/// A per-operation error reported by the store for a rolled back transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// Index of the failing operation within its transaction.
    pub operation_index: usize,
    /// Store-provided message.
    pub message: String,
}

impl OperationError {
    /// Creates a new operation error.
    pub fn new(operation_index: usize, message: impl Into<String>) -> Self {
        Self {
            operation_index,
            message: message.into(),
        }
    }
}

/// Outcome of submitting one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionResult {
    /// The transaction was applied and every operation succeeded.
    Committed,
    /// The transaction was fully rejected; nothing was applied.
    RolledBack(Vec<OperationError>),
}

impl TransactionResult {
    /// Returns true if the transaction committed.
    pub fn is_committed(&self) -> bool {
        matches!(self, TransactionResult::Committed)
    }
}
