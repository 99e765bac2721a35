//! Transaction request and response messages.
//!
//! These mirror the JSON accepted and returned by the Consul transaction
//! endpoint (`PUT /v1/txn`). Values travel base64 encoded.

use crate::error::{ProtocolError, ProtocolResult};
use crate::operation::{Operation, OperationError, Verb};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Encodes raw value bytes for transmission.
pub fn encode_value(value: &[u8]) -> String {
    STANDARD.encode(value)
}

/// Decodes a transmitted value back into raw bytes.
pub fn decode_value(encoded: &str) -> ProtocolResult<Vec<u8>> {
    Ok(STANDARD.decode(encoded)?)
}

/// Encodes a transaction request body.
pub fn encode_transaction(operations: &[Operation]) -> ProtocolResult<Vec<u8>> {
    let ops: Vec<TxnOp> = operations.iter().map(TxnOp::from).collect();
    serde_json::to_vec(&ops).map_err(ProtocolError::Encode)
}

/// A KV operation inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxnKvOp {
    /// Operation verb.
    pub verb: Verb,
    /// Remote key.
    pub key: String,
    /// Base64 encoded value.
    #[serde(default)]
    pub value: String,
    /// Opaque flags stored alongside the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

/// One element of a transaction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxnOp {
    /// KV operation.
    #[serde(rename = "KV", default, skip_serializing_if = "Option::is_none")]
    pub kv: Option<TxnKvOp>,
}

impl TxnOp {
    /// Decodes this wire operation back into an [`Operation`].
    ///
    /// Returns `Ok(None)` for non-KV operations.
    pub fn to_operation(&self) -> ProtocolResult<Option<Operation>> {
        let Some(kv) = &self.kv else {
            return Ok(None);
        };
        Ok(Some(Operation {
            verb: kv.verb,
            path: kv.key.clone(),
            value: decode_value(&kv.value)?,
        }))
    }
}

impl From<&Operation> for TxnOp {
    fn from(op: &Operation) -> Self {
        Self {
            kv: Some(TxnKvOp {
                verb: op.verb,
                key: op.path.clone(),
                value: encode_value(&op.value),
                flags: None,
            }),
        }
    }
}

/// KV data returned for a successful operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct KvData {
    /// Lock index.
    pub lock_index: u64,
    /// Key.
    pub key: String,
    /// Flags.
    pub flags: u64,
    /// Base64 encoded value (may be null).
    pub value: Option<String>,
    /// Index at which the key was created.
    pub create_index: u64,
    /// Index at which the key was last modified.
    pub modify_index: u64,
}

/// Result entry of a committed transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxnResult {
    /// KV result.
    #[serde(rename = "KV", default, skip_serializing_if = "Option::is_none")]
    pub kv: Option<KvData>,
}

/// Error entry of a rolled back transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxnError {
    /// Index of the failing operation.
    pub op_index: usize,
    /// Description of the failure.
    pub what: String,
}

impl From<TxnError> for OperationError {
    fn from(err: TxnError) -> Self {
        OperationError::new(err.op_index, err.what)
    }
}

/// Transaction response body.
///
/// The store sends `null` rather than an empty array for missing lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxnResponse {
    /// Per-operation results.
    #[serde(default)]
    pub results: Option<Vec<TxnResult>>,
    /// Per-operation errors.
    #[serde(default)]
    pub errors: Option<Vec<TxnError>>,
}

impl TxnResponse {
    /// Creates a response for a committed transaction.
    pub fn committed(results: Vec<TxnResult>) -> Self {
        Self {
            results: Some(results),
            errors: None,
        }
    }

    /// Creates a response for a rolled back transaction.
    pub fn rolled_back(errors: Vec<TxnError>) -> Self {
        Self {
            results: None,
            errors: Some(errors),
        }
    }

    /// Parses a response body.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        serde_json::from_slice(bytes).map_err(ProtocolError::Decode)
    }

    /// Serializes the response body.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }

    /// Consumes the response and returns its errors as operation errors.
    pub fn into_operation_errors(self) -> Vec<OperationError> {
        self.errors
            .unwrap_or_default()
            .into_iter()
            .map(OperationError::from)
            .collect()
    }
}

/// One record of a KV export, as consumed by `consul kv import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Remote key.
    pub key: String,
    /// Base64 encoded value.
    pub value: String,
}

impl ExportEntry {
    /// Creates an export record from a key and its raw value.
    pub fn new(key: impl Into<String>, value: &[u8]) -> Self {
        Self {
            key: key.into(),
            value: encode_value(value),
        }
    }
}
