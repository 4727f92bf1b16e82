use std::fs;
use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, TableDefinition};
use tracing::{debug, warn};

use crate::error::KvResult;
use crate::kv::OrderedKv;
use crate::scan::ScanSink;

/// File name of the database inside the configured data directory.
pub const DATABASE_FILE: &str = "strata.redb";

const DOCUMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");

/// Persistent ordered store backed by a single redb database file.
///
/// Every write commits its own transaction with immediate durability, so
/// `put` and `delete` return only after the data reached disk. A scan holds
/// one read transaction from its first entry to its end signal; concurrent
/// writes are not visible to a scan that is already running.
pub struct RedbKv {
    db: Database,
    path: PathBuf,
}

impl RedbKv {
    /// Open (or create) the store inside `dir`.
    pub fn open(dir: &Path) -> KvResult<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(DATABASE_FILE);
        let db = Database::create(&path)?;

        // Create the table up front so read transactions can always open it.
        let txn = db.begin_write()?;
        txn.open_table(DOCUMENTS)?;
        txn.commit()?;

        debug!(path = %path.display(), "opened redb store");
        Ok(Self { db, path })
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream every entry into `sink`. Returns `Ok(false)` if the consumer
    /// went away before the end.
    fn stream_into(&self, sink: &ScanSink) -> KvResult<bool> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;
        for item in table.iter()? {
            let (key, value) = item?;
            if !sink.emit(key.value(), value.value()) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl OrderedKv for RedbKv {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;
        let value = table.get(key)?.map(|guard| guard.value().to_vec());
        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8]) -> KvResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(DOCUMENTS)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn delete(&self, key: &str) -> KvResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(DOCUMENTS)?;
            let removed = table.remove(key)?;
            removed.is_some()
        };
        txn.commit()?;
        Ok(existed)
    }

    fn scan(&self, sink: ScanSink) {
        match self.stream_into(&sink) {
            Ok(true) => sink.finish(),
            Ok(false) => debug!("scan consumer went away; read transaction released"),
            Err(e) => {
                warn!(error = %e, "redb scan failed");
                sink.fail(e);
            }
        }
    }
}

impl std::fmt::Debug for RedbKv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbKv").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::scan::open_scan;

    #[test]
    fn open_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let kv = RedbKv::open(&dir.path().join("nested").join("data")).unwrap();
        assert!(kv.path().exists());
        assert!(kv.path().ends_with(DATABASE_FILE));
    }

    #[test]
    fn put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let kv = RedbKv::open(dir.path()).unwrap();

        kv.put("event:1", b"first").unwrap();
        assert_eq!(kv.get("event:1").unwrap(), Some(b"first".to_vec()));

        kv.put("event:1", b"second").unwrap();
        assert_eq!(kv.get("event:1").unwrap(), Some(b"second".to_vec()));

        assert!(kv.delete("event:1").unwrap());
        assert!(!kv.delete("event:1").unwrap());
        assert_eq!(kv.get("event:1").unwrap(), None);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let kv = RedbKv::open(dir.path()).unwrap();
            kv.put("account:a", b"{\"id\":\"a\"}").unwrap();
        }
        let kv = RedbKv::open(dir.path()).unwrap();
        assert_eq!(kv.get("account:a").unwrap(), Some(b"{\"id\":\"a\"}".to_vec()));
    }

    #[tokio::test]
    async fn scan_is_ascending() {
        let dir = tempfile::tempdir().unwrap();
        let kv = RedbKv::open(dir.path()).unwrap();
        for key in ["event:b", "account:z", "event:a"] {
            kv.put(key, b"{}").unwrap();
        }

        let mut stream = open_scan(Arc::new(kv), 1);
        let mut keys = Vec::new();
        while let Some(entry) = stream.next_entry().await.unwrap() {
            keys.push(entry.key);
        }
        assert_eq!(keys, vec!["account:z", "event:a", "event:b"]);
    }

    #[tokio::test]
    async fn abandoned_scan_releases_read_transaction() {
        let dir = tempfile::tempdir().unwrap();
        let kv = Arc::new(RedbKv::open(dir.path()).unwrap());
        for i in 0..50 {
            kv.put(&format!("event:{i:03}"), b"{}").unwrap();
        }

        let mut stream = open_scan(Arc::clone(&kv), 1);
        assert!(stream.next_entry().await.unwrap().is_some());
        drop(stream);

        // Writers are not blocked by the abandoned scan.
        let writer = Arc::clone(&kv);
        tokio::task::spawn_blocking(move || writer.put("event:new", b"{}"))
            .await
            .unwrap()
            .unwrap();
        assert!(kv.get("event:new").unwrap().is_some());
    }
}
