//! # kvsync Engine
//!
//! Synchronization engine that pushes hierarchical configuration sources
//! into a transactional key-value store.
//!
//! This crate provides:
//! - Flattening of nested mappings into `/`-joined paths
//! - Cross-source duplicate key detection
//! - Partitioning into bounded transactions
//! - Sequential batch execution with per-batch outcome accounting
//! - Remote store abstraction with an HTTP implementation
//!
//! ## Pipeline
//!
//! 1. Flatten every source independently
//! 2. Reject the run if any path is defined by two or more sources
//! 3. Merge all entries and split them into batches of at most 64 operations
//! 4. Submit the batches one by one and collect a summary
//!
//! ## Key Invariants
//!
//! - Duplicates abort the run before anything is sent to the store
//! - Every entry lands in exactly one batch
//! - Batches are submitted sequentially, in plan order
//! - A rolled back batch does not stop later batches
//! - A transport failure stops the run immediately

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod duplicates;
mod error;
mod executor;
mod flatten;
mod http;
mod planner;
mod summary;
mod transport;
mod value;

pub use config::{SyncConfig, DEFAULT_ADDRESS, DEFAULT_DATACENTER};
pub use duplicates::{
    detect, detect_duplicates, prepare, source_entries, DuplicateRecord, Occurrence, Source,
    SourceEntry,
};
pub use error::{SyncError, SyncResult};
pub use executor::SyncExecutor;
pub use flatten::{flatten, join_path, FlatEntry, PATH_SEPARATOR};
pub use http::{
    HttpClient, HttpResponse, HttpStore, LoopbackClient, LoopbackServer, STATUS_CONFLICT,
    STATUS_OK,
};
pub use planner::{Batch, BatchPlanner};
pub use summary::{BatchOutcome, ExecutionSummary, RunStatus};
pub use transport::{MockStore, RemoteStore};
pub use value::{Value, NIL_SENTINEL};
