//! Foundation types for Strata.
//!
//! This crate defines the contract every storable object implements and the
//! plain data types that travel between callers and storage backends. It has
//! no I/O of its own; `strata-query` evaluates the query trees defined here
//! and `strata-store` persists the objects.
//!
//! # Key Types
//!
//! - [`Storable`]: kind tag + identifier + JSON codec for a domain object
//! - [`StorageQuery`]: recursive predicate tree (comparisons, `and`, `or`, `not`)
//! - [`StorageListOptions`]: offset/limit/query/ordering for a list call
//! - [`ListParams`]: the loosely-typed form of list options sent by callers
//! - [`ListResponse`]: one page of results plus the unpaginated total

pub mod codec;
pub mod error;
pub mod options;
pub mod query;
pub mod response;
pub mod storable;

pub use codec::CodecError;
pub use error::TypeError;
pub use options::{ListParams, OrderDirection, StorageListOptions};
pub use query::{CompareOp, StorageQuery};
pub use response::ListResponse;
pub use storable::Storable;

/// Re-exported so callers can build query values without a direct
/// `serde_json` dependency.
pub use serde_json::{json, Value};
