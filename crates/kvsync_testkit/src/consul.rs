//! An in-memory Consul transaction endpoint.
//!
//! [`FakeConsul`] implements [`LoopbackServer`] so it can sit behind an
//! [`HttpStore`](kvsync_engine::HttpStore) and a
//! [`LoopbackClient`](kvsync_engine::LoopbackClient). It applies each
//! transaction atomically: either every operation lands or none does.

use kvsync_engine::{HttpResponse, LoopbackServer, SyncError, SyncResult};
use kvsync_protocol::{
    Operation, TxnError, TxnOp, TxnResponse, TxnResult, MAX_OPS_PER_TRANSACTION,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;

type RejectFn = Box<dyn Fn(&Operation) -> Option<String> + Send + Sync>;

/// A fake Consul server holding its KV store in memory.
pub struct FakeConsul {
    kv: Mutex<BTreeMap<String, Vec<u8>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    reject: Option<RejectFn>,
    unavailable_from: Option<usize>,
}

/// A transaction request the server received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Request path including the query string.
    pub path: String,
    /// Decoded operations.
    pub operations: Vec<Operation>,
}

impl FakeConsul {
    /// Creates a server that accepts every transaction.
    pub fn new() -> Self {
        Self {
            kv: Mutex::new(BTreeMap::new()),
            requests: Mutex::new(Vec::new()),
            reject: None,
            unavailable_from: None,
        }
    }

    /// Rejects any transaction containing an operation for which `reject`
    /// returns a reason.
    pub fn rejecting<F>(mut self, reject: F) -> Self
    where
        F: Fn(&Operation) -> Option<String> + Send + Sync + 'static,
    {
        self.reject = Some(Box::new(reject));
        self
    }

    /// Rejects transactions touching any key under `prefix`.
    pub fn rejecting_prefix(self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.rejecting(move |op| {
            op.path
                .starts_with(&prefix)
                .then(|| format!("Permission denied for key {:?}", op.path))
        })
    }

    /// Answers 503 to the `n`th request (0-based) and every request after it.
    pub fn unavailable_from(mut self, n: usize) -> Self {
        self.unavailable_from = Some(n);
        self
    }

    /// Returns the stored value of a key as text.
    pub fn get(&self, key: &str) -> Option<String> {
        self.kv
            .lock()
            .get(key)
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }

    /// Returns a snapshot of the store.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.kv
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), String::from_utf8_lossy(v).into_owned()))
            .collect()
    }

    /// Returns the number of keys stored.
    pub fn len(&self) -> usize {
        self.kv.lock().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.kv.lock().is_empty()
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn decode(body: &[u8]) -> SyncResult<Vec<Operation>> {
        let ops: Vec<TxnOp> =
            serde_json::from_slice(body).map_err(|e| SyncError::transport(e.to_string()))?;
        let mut operations = Vec::with_capacity(ops.len());
        for op in &ops {
            if let Some(op) = op.to_operation()? {
                operations.push(op);
            }
        }
        Ok(operations)
    }
}

impl Default for FakeConsul {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackServer for FakeConsul {
    fn handle_put(&self, path: &str, body: &[u8]) -> SyncResult<HttpResponse> {
        if !path.starts_with("/v1/txn") {
            return Ok(HttpResponse::new(404, "Not Found"));
        }

        let operations = Self::decode(body)?;
        let request_index = {
            let mut requests = self.requests.lock();
            requests.push(RecordedRequest {
                path: path.to_string(),
                operations: operations.clone(),
            });
            requests.len() - 1
        };

        if self.unavailable_from.is_some_and(|n| request_index >= n) {
            return Ok(HttpResponse::new(503, "No cluster leader"));
        }

        if operations.len() > MAX_OPS_PER_TRANSACTION {
            return Ok(HttpResponse::new(
                413,
                format!(
                    "Transaction contains too many operations ({} > {})",
                    operations.len(),
                    MAX_OPS_PER_TRANSACTION
                ),
            ));
        }

        let errors: Vec<TxnError> = match &self.reject {
            Some(reject) => operations
                .iter()
                .enumerate()
                .filter_map(|(op_index, op)| reject(op).map(|what| TxnError { op_index, what }))
                .collect(),
            None => Vec::new(),
        };

        if !errors.is_empty() {
            let body = TxnResponse::rolled_back(errors).encode()?;
            return Ok(HttpResponse::new(409, body));
        }

        let results = vec![TxnResult::default(); operations.len()];
        let mut kv = self.kv.lock();
        for op in operations {
            kv.insert(op.path, op.value);
        }
        let body = TxnResponse::committed(results).encode()?;
        Ok(HttpResponse::new(200, body))
    }
}
