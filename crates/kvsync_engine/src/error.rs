//! Error types for the sync engine.

use crate::duplicates::DuplicateRecord;
use kvsync_protocol::ProtocolError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during a sync run.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The number of mappings and source identifiers differ.
    #[error("mismatch between number of mappings ({mappings}) and source identifiers ({source_ids})")]
    ArityMismatch {
        /// Number of mappings supplied.
        mappings: usize,
        /// Number of source identifiers supplied.
        source_ids: usize,
    },

    /// One or more paths are defined by more than one source.
    #[error("duplicate keys detected: {} path(s) defined in more than one source", .0.len())]
    DuplicateKeys(Vec<DuplicateRecord>),

    /// The store could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The store did not answer within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The store answered with a body that could not be understood.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The store answered with a status that is neither commit nor rollback.
    #[error("unexpected status code {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// A transport failure aborted the run mid-way.
    #[error("batch {batch} aborted after {committed_batches} committed batch(es): {source}")]
    Interrupted {
        /// One-based index of the batch whose outcome is unknown.
        batch: usize,
        /// Number of batches confirmed committed before the failure.
        committed_batches: usize,
        /// Underlying transport failure.
        #[source]
        source: Box<SyncError>,
    },

    /// The store rolled back at least one batch.
    #[error("{failed} out of {total} batches failed")]
    BatchesFailed {
        /// Number of rolled back batches.
        failed: usize,
        /// Number of batches attempted.
        total: usize,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SyncError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns true if the error means the store's state for the current
    /// batch is unknown.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SyncError::Transport(_)
                | SyncError::Timeout
                | SyncError::Protocol(_)
                | SyncError::UnexpectedStatus { .. }
                | SyncError::Interrupted { .. }
        )
    }

    /// Returns true if the error was raised before anything was sent to the
    /// store.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            SyncError::ArityMismatch { .. }
                | SyncError::DuplicateKeys(_)
                | SyncError::InvalidConfig(_)
        )
    }
}
