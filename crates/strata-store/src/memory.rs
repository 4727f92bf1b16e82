use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{KvError, KvResult};
use crate::kv::OrderedKv;
use crate::scan::ScanSink;

/// In-memory, `BTreeMap`-based ordered store.
///
/// Intended for tests and embedding. Entries are held behind a `RwLock`; a
/// scan copies the map under the read lock and streams the copy, so writers
/// are never blocked by a slow consumer.
pub struct InMemoryKv {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryKv {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All keys, in order.
    pub fn keys(&self) -> KvResult<Vec<String>> {
        let map = self.entries.read().map_err(|_| KvError::Poisoned)?;
        Ok(map.keys().cloned().collect())
    }

    fn snapshot(&self) -> KvResult<Vec<(String, Vec<u8>)>> {
        let map = self.entries.read().map_err(|_| KvError::Poisoned)?;
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl Default for InMemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedKv for InMemoryKv {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(|_| KvError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> KvResult<()> {
        let mut map = self.entries.write().map_err(|_| KvError::Poisoned)?;
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> KvResult<bool> {
        let mut map = self.entries.write().map_err(|_| KvError::Poisoned)?;
        Ok(map.remove(key).is_some())
    }

    fn scan(&self, sink: ScanSink) {
        let entries = match self.snapshot() {
            Ok(entries) => entries,
            Err(e) => return sink.fail(e),
        };
        for (key, value) in entries {
            if !sink.emit(key, value) {
                return;
            }
        }
        sink.finish();
    }
}

impl std::fmt::Debug for InMemoryKv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKv")
            .field("entry_count", &self.len())
            .finish()
    }
}
