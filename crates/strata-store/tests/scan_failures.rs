//! Scan failure handling: errors and early stream termination must fail the
//! whole list/count call.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use strata_store::{
    InMemoryKv, KvError, KvResult, KvStorage, OrderedKv, ScanSink, Storage, StoreError,
};
use strata_types::{Storable, StorageListOptions};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Item {
    id: String,
}

impl Storable for Item {
    const KIND: &'static str = "item";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone, Copy, Debug)]
enum Fault {
    /// Emit `n` entries, then report an I/O error.
    ErrorAfter(usize),
    /// Emit `n` entries, then return without an end signal.
    CloseAfter(usize),
}

/// Delegates to an in-memory store but sabotages scans.
struct FaultyKv {
    inner: InMemoryKv,
    fault: Fault,
    scanned: AtomicBool,
}

impl FaultyKv {
    fn new(fault: Fault) -> Self {
        Self {
            inner: InMemoryKv::new(),
            fault,
            scanned: AtomicBool::new(false),
        }
    }
}

impl OrderedKv for FaultyKv {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> KvResult<()> {
        self.inner.put(key, value)
    }

    fn delete(&self, key: &str) -> KvResult<bool> {
        self.inner.delete(key)
    }

    fn scan(&self, sink: ScanSink) {
        self.scanned.store(true, Ordering::SeqCst);
        let keys = self.inner.keys().unwrap_or_default();
        let limit = match self.fault {
            Fault::ErrorAfter(n) | Fault::CloseAfter(n) => n,
        };
        for key in keys.into_iter().take(limit) {
            let value = self.inner.get(&key).ok().flatten().unwrap_or_default();
            if !sink.emit(key, value) {
                return;
            }
        }
        match self.fault {
            Fault::ErrorAfter(_) => sink.fail(KvError::Io(std::io::Error::other("disk went away"))),
            Fault::CloseAfter(_) => drop(sink),
        }
    }
}

async fn seeded(fault: Fault) -> KvStorage<FaultyKv> {
    let storage = KvStorage::new(FaultyKv::new(fault));
    for i in 0..5 {
        storage.save(&Item { id: format!("i{i}") }).await.unwrap();
    }
    storage
}

#[tokio::test]
async fn io_error_fails_list() {
    let storage = seeded(Fault::ErrorAfter(2)).await;
    let err = storage
        .list::<Item>(StorageListOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Kv(KvError::Io(_))));
    assert!(err.to_string().contains("disk went away"));
    assert!(storage.backend().scanned.load(Ordering::SeqCst));
}

#[tokio::test]
async fn io_error_fails_count() {
    let storage = seeded(Fault::ErrorAfter(0)).await;
    let err = storage.count::<Item>(None).await.unwrap_err();
    assert!(matches!(err, StoreError::Kv(_)));
}

#[tokio::test]
async fn early_close_is_unexpected_termination() {
    let storage = seeded(Fault::CloseAfter(3)).await;
    let err = storage
        .list::<Item>(StorageListOptions::new().limit(1))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedStreamTermination));

    let err = storage.count::<Item>(None).await.unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedStreamTermination));
}

#[tokio::test]
async fn point_access_is_unaffected_by_scan_faults() {
    let storage = seeded(Fault::CloseAfter(0)).await;
    let item = storage.get::<Item>("i3").await.unwrap();
    assert_eq!(item.id, "i3");
}

/// A producer that panics mid-scan drops its sink.
struct PanickingKv;

impl OrderedKv for PanickingKv {
    fn get(&self, _key: &str) -> KvResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: &[u8]) -> KvResult<()> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> KvResult<bool> {
        Ok(false)
    }

    fn scan(&self, sink: ScanSink) {
        sink.emit("item:1", b"{\"id\":\"1\"}".to_vec());
        panic!("cursor exploded");
    }
}

#[tokio::test]
async fn panicking_producer_is_unexpected_termination() {
    let storage = KvStorage::new(PanickingKv);
    let err = storage
        .list::<Item>(StorageListOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedStreamTermination));
}
