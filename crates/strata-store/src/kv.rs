use crate::error::KvResult;
use crate::scan::ScanSink;

/// A single `(key, value)` pair produced by a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KvEntry {
    pub key: String,
    pub value: Vec<u8>,
}

impl KvEntry {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered key-value substrate underneath [`KvStorage`](crate::KvStorage).
///
/// All implementations must satisfy these invariants:
/// - `put` overwrites unconditionally and returns once the write is durable
///   per the backend's own contract.
/// - `delete` of an absent key succeeds.
/// - `scan` emits every entry in ascending lexicographic key order and
///   ends with exactly one of [`ScanSink::finish`] or [`ScanSink::fail`].
///   When [`ScanSink::emit`] returns `false` the consumer has gone away:
///   stop and release any cursor or read transaction.
///
/// Methods are blocking. The storage layer calls them from
/// `tokio::task::spawn_blocking`.
pub trait OrderedKv: Send + Sync + 'static {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> KvResult<()>;

    /// Remove `key`. Returns `true` if it existed.
    fn delete(&self, key: &str) -> KvResult<bool>;

    /// Stream every entry of the store, in key order, into `sink`.
    fn scan(&self, sink: ScanSink);
}
