use async_trait::async_trait;
use strata_types::{ListResponse, Storable, StorageListOptions, StorageQuery};

use crate::error::StoreResult;

/// Caller-facing storage contract.
///
/// Every backend (the ordered key-value adapter here, or any other store)
/// must give these operations the same meaning:
///
/// - `get` fails with [`StoreError::NotFound`](crate::StoreError::NotFound)
///   for an absent object and with
///   [`StoreError::Decode`](crate::StoreError::Decode) for an unreadable one.
/// - `save` creates or overwrites.
/// - `delete` of an absent object succeeds.
/// - `list` returns the `[offset, offset + limit)` window of all matches,
///   ordered as requested, with `total` counting every match.
/// - `count` equals the number of items `list` returns for the same query
///   and no window.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the object of type `T` with the given id.
    async fn get<T: Storable>(&self, id: &str) -> StoreResult<T>;

    /// Create or overwrite an object.
    async fn save<T: Storable>(&self, object: &T) -> StoreResult<()>;

    /// Remove an object. Absent objects are not an error.
    async fn delete<T: Storable>(&self, object: &T) -> StoreResult<()>;

    /// Remove everything. Backends may refuse with
    /// [`StoreError::NotImplemented`](crate::StoreError::NotImplemented).
    async fn clear(&self) -> StoreResult<()>;

    /// List objects of type `T`.
    async fn list<T: Storable>(&self, options: StorageListOptions)
        -> StoreResult<ListResponse<T>>;

    /// Count objects of type `T` matching `query`.
    async fn count<T: Storable>(&self, query: Option<StorageQuery>) -> StoreResult<usize> {
        let response = self
            .list::<T>(StorageListOptions::filter_only(query))
            .await?;
        Ok(response.items.len())
    }
}
