use strata_types::{
    ListParams, ListResponse, OrderDirection, Storable, StorageListOptions, StorageQuery,
};

use crate::error::{StoreError, StoreResult};
use crate::storage::Storage;

/// Read-only list/count entry point over any [`Storage`].
///
/// Holds no state of its own; it only turns caller-supplied [`ListParams`]
/// into [`StorageListOptions`] and forwards.
#[derive(Debug)]
pub struct ListFacade<'a, S> {
    storage: &'a S,
}

impl<'a, S: Storage> ListFacade<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// List objects of type `T` according to loosely-typed `params`.
    pub async fn list<T: Storable>(&self, params: ListParams) -> StoreResult<ListResponse<T>> {
        let options = normalize_params(params)?;
        self.storage.list::<T>(options).await
    }

    /// Count objects of type `T` matching `query`.
    pub async fn count<T: Storable>(&self, query: Option<StorageQuery>) -> StoreResult<usize> {
        self.storage.count::<T>(query).await
    }
}

/// Apply defaults to caller-supplied list parameters.
///
/// - `offset` defaults to 0 and `limit` to unbounded
/// - a blank `orderBy` is ignored
/// - `orderByDirection` is parsed leniently and defaults to ascending
pub fn normalize_params(params: ListParams) -> StoreResult<StorageListOptions> {
    let order_by = params
        .order_by
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty());

    let order_by_direction = match params.order_by_direction.as_deref().map(str::trim) {
        None | Some("") => OrderDirection::Asc,
        Some(text) => text
            .parse()
            .map_err(|e: strata_types::TypeError| StoreError::InvalidListParams(e.to_string()))?,
    };

    Ok(StorageListOptions {
        offset: params.offset.unwrap_or(0),
        limit: params.limit,
        query: params.query,
        order_by,
        order_by_direction,
    })
}
