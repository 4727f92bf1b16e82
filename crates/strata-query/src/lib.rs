//! Query engine for Strata.
//!
//! Evaluates [`StorageQuery`](strata_types::StorageQuery) trees against
//! decoded documents and orders documents by a field. Everything here is pure
//! and total: paths that cannot be resolved and values of mismatched types
//! make a comparison false instead of raising an error.
//!
//! # Modules
//!
//! - [`path`]: dotted path resolution through nested objects and arrays
//! - [`compare`]: semantic comparison of JSON scalars
//! - [`predicate`]: [`matches`], the recursive predicate evaluator
//! - [`sort`]: [`SortOrder`], a total, direction-aware document ordering

pub mod compare;
pub mod path;
pub mod predicate;
pub mod sort;

pub use compare::compare_values;
pub use path::resolve_path;
pub use predicate::matches;
pub use sort::{sort_by, SortOrder};
