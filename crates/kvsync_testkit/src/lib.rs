//! # kvsync Testkit
//!
//! Test utilities for kvsync.
//!
//! This crate provides:
//! - Property-based test generators using proptest
//! - A fake Consul transaction endpoint served over the loopback client
//! - Fixtures for building sources and executors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kvsync_testkit::prelude::*;
//!
//! #[test]
//! fn syncs_into_fake_consul() {
//!     let consul = Arc::new(FakeConsul::new());
//!     let executor = fake_executor(consul.clone());
//!     // ... run executor.sync(..) and inspect consul
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod consul;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::consul::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use consul::*;
pub use fixtures::*;
pub use generators::*;
