//! HTTP store implementation.
//!
//! This module provides a store backed by the Consul transaction endpoint.
//! The actual HTTP client is abstracted via a trait to allow different
//! implementations (reqwest, in-process loopback, etc.).

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::transport::RemoteStore;
use kvsync_protocol::{
    encode_transaction, Operation, TransactionResult, TxnResponse, MAX_OPS_PER_TRANSACTION,
};
use std::sync::Arc;
use tracing::trace;

/// Status returned when the transaction was applied.
pub const STATUS_OK: u16 = 200;

/// Status returned when the transaction was rolled back.
pub const STATUS_CONFLICT: u16 = 409;

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// HTTP client abstraction.
///
/// Implementations map connection failures to [`SyncError::Transport`] and
/// elapsed timeouts to [`SyncError::Timeout`].
pub trait HttpClient: Send + Sync {
    /// Sends a PUT request with a JSON body.
    fn put(&self, url: &str, body: Vec<u8>) -> SyncResult<HttpResponse>;
}

/// HTTP-based store.
pub struct HttpStore<C: HttpClient> {
    txn_url: String,
    client: C,
}

impl<C: HttpClient> HttpStore<C> {
    /// Creates a new HTTP store for the configured address and datacenter.
    pub fn new(config: &SyncConfig, client: C) -> Self {
        Self {
            txn_url: config.txn_url(),
            client,
        }
    }

    /// Returns the transaction endpoint URL.
    pub fn txn_url(&self) -> &str {
        &self.txn_url
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: HttpClient> RemoteStore for HttpStore<C> {
    fn submit_transaction(&self, operations: &[Operation]) -> SyncResult<TransactionResult> {
        if operations.len() > MAX_OPS_PER_TRANSACTION {
            return Err(SyncError::InvalidConfig(format!(
                "transaction of {} operations exceeds the limit of {}",
                operations.len(),
                MAX_OPS_PER_TRANSACTION
            )));
        }

        let body = encode_transaction(operations)?;
        let response = self.client.put(&self.txn_url, body)?;
        trace!(status = response.status, bytes = response.body.len(), "txn response");

        match response.status {
            STATUS_OK => {
                TxnResponse::decode(&response.body)?;
                Ok(TransactionResult::Committed)
            }
            STATUS_CONFLICT => {
                let txn = TxnResponse::decode(&response.body)?;
                Ok(TransactionResult::RolledBack(txn.into_operation_errors()))
            }
            status => Err(SyncError::UnexpectedStatus {
                status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            }),
        }
    }
}

/// A loopback HTTP client that routes requests directly to a server.
///
/// Useful for testing without actual network overhead.
pub struct LoopbackClient<S: LoopbackServer> {
    server: S,
}

impl<S: LoopbackServer> LoopbackClient<S> {
    /// Creates a new loopback client connected to the given server.
    pub fn new(server: S) -> Self {
        Self { server }
    }

    /// Returns the server.
    pub fn server(&self) -> &S {
        &self.server
    }
}

/// Trait for servers that can handle loopback requests.
pub trait LoopbackServer: Send + Sync {
    /// Handles a PUT request and returns the response.
    fn handle_put(&self, path: &str, body: &[u8]) -> SyncResult<HttpResponse>;
}

impl<S: LoopbackServer + ?Sized> LoopbackServer for Arc<S> {
    fn handle_put(&self, path: &str, body: &[u8]) -> SyncResult<HttpResponse> {
        (**self).handle_put(path, body)
    }
}

impl<S: LoopbackServer> HttpClient for LoopbackClient<S> {
    fn put(&self, url: &str, body: Vec<u8>) -> SyncResult<HttpResponse> {
        // Extract path from URL
        let path = url.find("/v1/").map(|i| &url[i..]).unwrap_or(url);

        self.server.handle_put(path, &body)
    }
}
