//! # kvsync Protocol
//!
//! Wire types for the transactional key-value store that kvsync writes to.
//!
//! This crate provides:
//! - `Operation` for single mutations against the store
//! - Transaction request/response messages (Consul `/v1/txn` JSON shape)
//! - `TransactionResult` for commit / rollback outcomes
//! - Base64 value encoding and the KV export record format
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod messages;
mod operation;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    decode_value, encode_transaction, encode_value, ExportEntry, KvData, TxnError, TxnKvOp,
    TxnOp, TxnResponse, TxnResult,
};
pub use operation::{Operation, OperationError, TransactionResult, Verb};

/// Maximum number of operations the store accepts in one transaction.
pub const MAX_OPS_PER_TRANSACTION: usize = 64;
