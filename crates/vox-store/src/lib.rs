//! # vox-store
//!
//! Durable state for the Vox engine.
//!
//! - **Run-metadata store**: [`run_store::SqliteRunStore`] persists one
//!   [`CostRecord`] per run, keyed by `(user_id, assistant_id, run_id)`
//!   with overwrite semantics
//! - **Object storage**: [`object_store::FsObjectStore`] holds archived
//!   call recordings under `bucket/key` paths
//!
//! ## Crate Position
//!
//! Depends on: vox-core.
//! Depended on by: vox-billing, vox-runtime.
//!
//! [`CostRecord`]: vox_core::cost::CostRecord

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod object_store;
pub mod run_store;

pub use connection::{ConnectionConfig, ConnectionPool, new_file, new_in_memory};
pub use errors::{Result, StoreError};
pub use object_store::{FsObjectStore, ObjectStore};
pub use run_store::{RunStore, SqliteRunStore};
