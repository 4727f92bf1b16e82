//! Streaming full-store scans.
//!
//! A backend produces entries on a blocking thread and pushes them into a
//! bounded channel through a [`ScanSink`]; the storage layer consumes them
//! asynchronously from a [`ScanStream`]. The stream distinguishes three ways
//! a scan can stop:
//!
//! - an explicit end signal ([`ScanSink::finish`]): normal completion
//! - an explicit error ([`ScanSink::fail`]): [`StoreError::Kv`]
//! - the sink being dropped without either: [`StoreError::UnexpectedStreamTermination`]
//!
//! Dropping the stream closes the channel. The producer sees
//! [`ScanSink::emit`] return `false` and releases its cursor.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{KvError, StoreError, StoreResult};
use crate::kv::{KvEntry, OrderedKv};

/// One message on a scan channel.
#[derive(Debug)]
pub enum ScanEvent {
    Entry(KvEntry),
    End,
    Error(KvError),
}

/// Producer half of a scan.
#[derive(Debug)]
pub struct ScanSink {
    tx: mpsc::Sender<ScanEvent>,
}

impl ScanSink {
    /// Send one entry. Blocks while the channel is full.
    ///
    /// Returns `false` once the consumer has dropped its stream; the
    /// producer must stop scanning.
    pub fn emit(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> bool {
        self.tx
            .blocking_send(ScanEvent::Entry(KvEntry::new(key, value)))
            .is_ok()
    }

    /// Signal normal completion.
    pub fn finish(self) {
        let _ = self.tx.blocking_send(ScanEvent::End);
    }

    /// Signal that the scan failed.
    pub fn fail(self, error: KvError) {
        let _ = self.tx.blocking_send(ScanEvent::Error(error));
    }

    /// Whether the consumer has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half of a scan.
#[derive(Debug)]
pub struct ScanStream {
    rx: mpsc::Receiver<ScanEvent>,
    done: bool,
}

impl ScanStream {
    /// Create a connected sink/stream pair with room for `buffer` events.
    pub fn channel(buffer: usize) -> (ScanSink, ScanStream) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (ScanSink { tx }, ScanStream { rx, done: false })
    }

    /// Next entry of the scan, or `None` after the end signal.
    pub async fn next_entry(&mut self) -> StoreResult<Option<KvEntry>> {
        if self.done {
            return Ok(None);
        }
        match self.rx.recv().await {
            Some(ScanEvent::Entry(entry)) => Ok(Some(entry)),
            Some(ScanEvent::End) => {
                self.done = true;
                Ok(None)
            }
            Some(ScanEvent::Error(error)) => {
                self.done = true;
                Err(StoreError::Kv(error))
            }
            None => {
                self.done = true;
                Err(StoreError::UnexpectedStreamTermination)
            }
        }
    }

    /// Stop consuming. The producer observes the closed channel on its next
    /// send.
    pub fn close(&mut self) {
        self.done = true;
        self.rx.close();
    }
}

/// Start a full scan of `backend` on the blocking thread pool.
pub fn open_scan<B: OrderedKv>(backend: Arc<B>, buffer: usize) -> ScanStream {
    let (sink, stream) = ScanStream::channel(buffer);
    tokio::task::spawn_blocking(move || {
        backend.scan(sink);
        debug!("scan producer exited");
    });
    stream
}
