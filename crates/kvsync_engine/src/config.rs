//! Configuration for the sync engine.

use crate::error::{SyncError, SyncResult};
use kvsync_protocol::MAX_OPS_PER_TRANSACTION;
use std::time::Duration;

/// Default store address.
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:8500";

/// Default datacenter.
pub const DEFAULT_DATACENTER: &str = "dc1";

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Store HTTP address (e.g. "http://127.0.0.1:8500").
    pub address: String,
    /// Datacenter the transaction is sent to.
    pub datacenter: String,
    /// ACL token sent with every request.
    pub token: Option<String>,
    /// Request timeout for a single batch submission.
    pub timeout: Duration,
    /// Pause between consecutive batches.
    pub batch_delay: Duration,
    /// Maximum number of operations per transaction.
    pub max_operations: usize,
}

impl SyncConfig {
    /// Creates a new sync configuration.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            datacenter: DEFAULT_DATACENTER.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            batch_delay: Duration::from_millis(100),
            max_operations: MAX_OPS_PER_TRANSACTION,
        }
    }

    /// Sets the datacenter.
    pub fn with_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.datacenter = datacenter.into();
        self
    }

    /// Sets the ACL token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the pause between batches.
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Sets the maximum number of operations per transaction.
    pub fn with_max_operations(mut self, max: usize) -> Self {
        self.max_operations = max;
        self
    }

    /// Returns the transaction endpoint URL.
    pub fn txn_url(&self) -> String {
        format!(
            "{}/v1/txn?dc={}",
            self.address.trim_end_matches('/'),
            self.datacenter
        )
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> SyncResult<()> {
        if self.address.is_empty() {
            return Err(SyncError::InvalidConfig("store address is empty".into()));
        }
        if self.max_operations == 0 || self.max_operations > MAX_OPS_PER_TRANSACTION {
            return Err(SyncError::InvalidConfig(format!(
                "operations per transaction must be between 1 and {}, got {}",
                MAX_OPS_PER_TRANSACTION, self.max_operations
            )));
        }
        if self.timeout.is_zero() {
            return Err(SyncError::InvalidConfig("timeout must be non-zero".into()));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS)
    }
}
