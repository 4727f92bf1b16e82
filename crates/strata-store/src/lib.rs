//! Namespaced object storage for Strata.
//!
//! This crate maps typed [`Storable`](strata_types::Storable) objects onto a
//! single ordered key-value store. Every object lives under the physical key
//! `kind:id`, so one collection is a contiguous key range.
//!
//! # Layers
//!
//! - [`OrderedKv`]: the substrate, with point get/put/delete plus a full
//!   ascending scan streamed through a [`ScanSink`]
//! - [`InMemoryKv`] and [`RedbKv`]: substrate backends
//! - [`Storage`]: the caller contract (`get`, `save`, `delete`, `clear`,
//!   `list`, `count`)
//! - [`KvStorage`]: the [`Storage`] implementation over any [`OrderedKv`]
//! - [`ListFacade`]: normalizes loosely-typed [`ListParams`](strata_types::ListParams)
//!
//! # Design Rules
//!
//! 1. `list` and `count` scan the whole store and filter by key prefix.
//!    Their cost is linear in the number of stored records.
//! 2. A record that fails to decode during a scan is logged and skipped;
//!    the same failure on point access is returned to the caller.
//! 3. Scan I/O errors and streams that close without an end signal fail the
//!    whole call. There are no partial results.
//! 4. Deleting an absent object succeeds.
//! 5. No retries, locks or transactions above single-key atomicity.

pub mod adapter;
pub mod config;
pub mod error;
pub mod facade;
pub mod keys;
pub mod kv;
pub mod memory;
pub mod redb_kv;
pub mod scan;
pub mod storage;

pub use adapter::{KvStorage, RedbStorage};
pub use config::StoreConfig;
pub use error::{KvError, KvResult, StoreError, StoreResult};
pub use facade::{normalize_params, ListFacade};
pub use kv::{KvEntry, OrderedKv};
pub use memory::InMemoryKv;
pub use redb_kv::RedbKv;
pub use scan::{ScanEvent, ScanSink, ScanStream};
pub use storage::Storage;
