use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use strata_query::{matches, SortOrder};
use strata_types::codec::{self, CodecError};
use strata_types::{ListResponse, Storable, StorageListOptions, StorageQuery};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{KvResult, StoreError, StoreResult};
use crate::keys;
use crate::kv::OrderedKv;
use crate::redb_kv::RedbKv;
use crate::scan::open_scan;
use crate::storage::Storage;

/// Default number of scanned entries buffered ahead of the list pipeline.
const DEFAULT_SCAN_BUFFER: usize = 256;

/// [`Storage`] over an ordered key-value store.
///
/// Objects are stored as JSON under `kind:id`. `list` and `count` read the
/// whole store, keep the keys inside the kind's namespace, decode, filter,
/// sort and finally slice. Nothing is indexed; cost grows linearly with the
/// total number of stored records.
pub struct KvStorage<B> {
    backend: Arc<B>,
    scan_buffer: usize,
}

/// The persistent configuration: [`KvStorage`] over [`RedbKv`].
pub type RedbStorage = KvStorage<RedbKv>;

impl KvStorage<RedbKv> {
    /// Open the redb-backed store described by `config`.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let backend = RedbKv::open(&config.dir)?;
        Ok(Self::new(backend).with_scan_buffer(config.scan_buffer))
    }
}

impl<B: OrderedKv> KvStorage<B> {
    pub fn new(backend: B) -> Self {
        Self::from_shared(Arc::new(backend))
    }

    /// Wrap a backend that is shared with other owners.
    pub fn from_shared(backend: Arc<B>) -> Self {
        Self {
            backend,
            scan_buffer: DEFAULT_SCAN_BUFFER,
        }
    }

    pub fn with_scan_buffer(mut self, scan_buffer: usize) -> Self {
        self.scan_buffer = scan_buffer.max(1);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // -----------------------------------------------------------------------
    // Untyped documents
    // -----------------------------------------------------------------------

    /// Fetch the raw JSON document stored under `(kind, id)`.
    pub async fn get_document(&self, kind: &str, id: &str) -> StoreResult<Value> {
        let key = keys::object_key(kind, id)?;
        let bytes = self.read(key.clone()).await?.ok_or_else(|| StoreError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        })?;
        codec::decode_document(&bytes).map_err(|source| StoreError::Decode { key, source })
    }

    /// Store a raw JSON document under `(kind, id)`.
    pub async fn save_document(&self, kind: &str, id: &str, document: &Value) -> StoreResult<()> {
        let key = keys::object_key(kind, id)?;
        let bytes = codec::encode_document(document).map_err(|source| StoreError::Encode {
            key: key.clone(),
            source,
        })?;
        self.write(key, bytes).await
    }

    /// Remove the document under `(kind, id)`. Absent documents are not an
    /// error; the return value tells whether something was removed.
    pub async fn delete_document(&self, kind: &str, id: &str) -> StoreResult<bool> {
        let key = keys::object_key(kind, id)?;
        self.remove(key).await
    }

    /// List raw JSON documents of `kind`.
    pub async fn list_documents(
        &self,
        kind: &str,
        options: StorageListOptions,
    ) -> StoreResult<ListResponse<Value>> {
        let page = self.collect(kind, &options, |_| Ok(())).await?;
        Ok(page.map(|(document, ())| document))
    }

    /// Count raw JSON documents of `kind` matching `query`.
    pub async fn count_documents(&self, kind: &str, query: Option<StorageQuery>) -> StoreResult<usize> {
        let page = self
            .list_documents(kind, StorageListOptions::filter_only(query))
            .await?;
        Ok(page.items.len())
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    /// Scan the namespace of `kind`, keeping each match as its document plus
    /// whatever `decode` turns it into.
    async fn collect<T, F>(
        &self,
        kind: &str,
        options: &StorageListOptions,
        decode: F,
    ) -> StoreResult<ListResponse<(Value, T)>>
    where
        T: Send,
        F: Fn(&Value) -> Result<T, CodecError> + Send + Sync,
    {
        let prefix = keys::namespace(kind)?;
        let mut stream = open_scan(Arc::clone(&self.backend), self.scan_buffer);

        let mut matched: Vec<(Value, T)> = Vec::new();
        let mut scanned = 0usize;
        let mut skipped = 0usize;

        while let Some(entry) = stream.next_entry().await? {
            scanned += 1;
            if !entry.key.starts_with(&prefix) {
                continue;
            }
            let decoded = codec::decode_document(&entry.value)
                .and_then(|document| decode(&document).map(|object| (document, object)));
            let (document, object) = match decoded {
                Ok(pair) => pair,
                Err(error) => {
                    skipped += 1;
                    warn!(key = %entry.key, %error, "skipping record that failed to decode");
                    continue;
                }
            };
            if options.query.as_ref().map_or(true, |q| matches(&document, q)) {
                matched.push((document, object));
            }
        }

        if let Some(field) = options.order_by.as_deref() {
            let order = SortOrder::new(field, options.order_by_direction);
            // Stable: ties keep scan (key) order.
            matched.sort_by(|a, b| order.compare(&a.0, &b.0));
        }

        let total = matched.len();
        let (start, end) = options.window(total);
        let items: Vec<(Value, T)> = matched.into_iter().skip(start).take(end - start).collect();

        let leaves = options.query.as_ref().map_or(0, StorageQuery::leaf_count);
        debug!(kind, leaves, scanned, skipped, total, returned = items.len(), "list complete");
        Ok(ListResponse::new(items, options.offset, total))
    }

    // -----------------------------------------------------------------------
    // Blocking bridge
    // -----------------------------------------------------------------------

    async fn blocking<R, F>(&self, op: F) -> StoreResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&B) -> KvResult<R> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let result = tokio::task::spawn_blocking(move || op(&backend))
            .await
            .map_err(|e| StoreError::Background(e.to_string()))?;
        Ok(result?)
    }

    async fn read(&self, key: String) -> StoreResult<Option<Vec<u8>>> {
        self.blocking(move |kv| kv.get(&key)).await
    }

    async fn write(&self, key: String, value: Vec<u8>) -> StoreResult<()> {
        debug!(%key, len = value.len(), "put");
        self.blocking(move |kv| kv.put(&key, &value)).await
    }

    async fn remove(&self, key: String) -> StoreResult<bool> {
        debug!(%key, "delete");
        self.blocking(move |kv| kv.delete(&key)).await
    }
}

#[async_trait]
impl<B: OrderedKv> Storage for KvStorage<B> {
    async fn get<T: Storable>(&self, id: &str) -> StoreResult<T> {
        let key = keys::object_key(T::KIND, id)?;
        let bytes = self.read(key.clone()).await?.ok_or_else(|| StoreError::NotFound {
            kind: T::KIND.to_string(),
            id: id.to_string(),
        })?;
        codec::decode(&bytes).map_err(|source| StoreError::Decode { key, source })
    }

    async fn save<T: Storable>(&self, object: &T) -> StoreResult<()> {
        let key = keys::object_key(T::KIND, object.id())?;
        let bytes = codec::encode(object).map_err(|source| StoreError::Encode {
            key: key.clone(),
            source,
        })?;
        self.write(key, bytes).await
    }

    async fn delete<T: Storable>(&self, object: &T) -> StoreResult<()> {
        let key = keys::object_key(T::KIND, object.id())?;
        self.remove(key).await?;
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        Err(StoreError::NotImplemented("clear"))
    }

    async fn list<T: Storable>(&self, options: StorageListOptions) -> StoreResult<ListResponse<T>> {
        let page = self
            .collect(T::KIND, &options, |document| codec::decode_object::<T>(document))
            .await?;
        Ok(page.map(|(_, object)| object))
    }
}

impl<B> std::fmt::Debug for KvStorage<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStorage")
            .field("backend", &std::any::type_name::<B>())
            .field("scan_buffer", &self.scan_buffer)
            .finish()
    }
}
