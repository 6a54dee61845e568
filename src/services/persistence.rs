//! Background persistence worker.
//!
//! A single worker thread owns the key-value store and drains a FIFO command
//! queue. Writes are fire-and-forget: the caller enqueues a full snapshot of
//! its state and returns immediately. Because there is exactly one consumer,
//! writes complete in the order they were issued.
//!
//! Every payload is a complete snapshot, so the most recently issued write
//! dominates all earlier ones for the same key. The worker relies on this to
//! coalesce runs of queued writes: only the newest payload of a run is written.
//! Dropping superseded payloads can never leave storage behind the newest
//! issued state once the queue drains.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use crate::services::storage::KeyValueStoreTrait;
use crate::types::errors::StorageError;

/// Completion callback for a load, invoked on the worker thread.
pub type LoadCallback = Box<dyn FnOnce(Result<Option<String>, StorageError>) + Send>;

enum Command {
    Load { key: String, on_complete: LoadCallback },
    Write(WriteRequest),
    Flush(oneshot::Sender<()>),
}

struct WriteRequest {
    seq: u64,
    key: String,
    payload: String,
}

#[derive(Debug, Default)]
struct Counters {
    issued: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    coalesced: AtomicU64,
    last_written_seq: AtomicU64,
}

/// Point-in-time view of the worker's write counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistenceStats {
    /// Writes handed to the queue.
    pub issued: u64,
    /// Writes that reached storage successfully.
    pub completed: u64,
    /// Writes rejected by storage (or issued after the worker stopped).
    pub failed: u64,
    /// Writes skipped because a newer write for the same key was queued behind them.
    pub coalesced: u64,
    /// Sequence number of the last successful write, 0 if none.
    pub last_written_seq: u64,
}

/// Cloneable handle for submitting work to the persistence worker.
///
/// The worker thread exits once every handle has been dropped and the queue
/// is drained.
#[derive(Clone)]
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<Command>,
    counters: Arc<Counters>,
}

impl PersistenceHandle {
    /// Starts a worker thread that takes ownership of `store`.
    ///
    /// Does not require a Tokio runtime.
    pub fn spawn<S>(store: S) -> std::io::Result<Self>
    where
        S: KeyValueStoreTrait + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());
        let worker = PersistenceWorker {
            store,
            rx,
            counters: counters.clone(),
        };
        thread::Builder::new()
            .name("bookmark-persistence".to_string())
            .spawn(move || worker.run())?;
        Ok(Self { tx, counters })
    }

    /// Reads `key` in the background and hands the result to `on_complete`.
    ///
    /// If the worker has stopped, `on_complete` runs immediately on the calling
    /// thread with [`StorageError::Unavailable`].
    pub fn load(&self, key: &str, on_complete: LoadCallback) {
        let command = Command::Load {
            key: key.to_string(),
            on_complete,
        };
        if let Err(mpsc::error::SendError(command)) = self.tx.send(command) {
            if let Command::Load { on_complete, .. } = command {
                on_complete(Err(StorageError::Unavailable(
                    "persistence worker stopped".to_string(),
                )));
            }
        }
    }

    /// Enqueues a full-snapshot write. Never blocks and never fails the caller.
    pub fn write(&self, seq: u64, key: &str, payload: String) {
        self.counters.issued.fetch_add(1, Ordering::Relaxed);
        let request = WriteRequest {
            seq,
            key: key.to_string(),
            payload,
        };
        if self.tx.send(Command::Write(request)).is_err() {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
            warn!(seq, key, "Persistence worker stopped, dropping write");
        }
    }

    /// Resolves once every command enqueued before this call has been processed.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    /// Blocking variant of [`flush`](Self::flush).
    ///
    /// Must not be called from within an async execution context.
    pub fn flush_blocking(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.blocking_recv();
    }

    pub fn stats(&self) -> PersistenceStats {
        PersistenceStats {
            issued: self.counters.issued.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            coalesced: self.counters.coalesced.load(Ordering::Relaxed),
            last_written_seq: self.counters.last_written_seq.load(Ordering::Relaxed),
        }
    }
}

struct PersistenceWorker<S> {
    store: S,
    rx: mpsc::UnboundedReceiver<Command>,
    counters: Arc<Counters>,
}

impl<S: KeyValueStoreTrait> PersistenceWorker<S> {
    fn run(mut self) {
        debug!("Persistence worker started");
        while let Some(first) = self.rx.blocking_recv() {
            let mut batch = vec![first];
            while let Ok(command) = self.rx.try_recv() {
                batch.push(command);
            }
            self.process(batch);
        }
        debug!("Persistence worker stopped");
    }

    fn process(&mut self, batch: Vec<Command>) {
        let mut commands = batch.into_iter().peekable();
        while let Some(command) = commands.next() {
            match command {
                Command::Load { key, on_complete } => {
                    let result = self.store.get(&key);
                    debug!(key = %key, found = matches!(result, Ok(Some(_))), "Loaded persisted value");
                    on_complete(result);
                }
                Command::Write(request) => {
                    let superseded = matches!(
                        commands.peek(),
                        Some(Command::Write(next)) if next.key == request.key
                    );
                    if superseded {
                        trace!(seq = request.seq, "Write superseded by a newer snapshot");
                        self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
                        continue;
                    }
                    self.write(request);
                }
                Command::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    }

    fn write(&mut self, request: WriteRequest) {
        match self.store.set(&request.key, &request.payload) {
            Ok(()) => {
                self.counters.completed.fetch_add(1, Ordering::Relaxed);
                self.counters
                    .last_written_seq
                    .store(request.seq, Ordering::Relaxed);
                debug!(seq = request.seq, key = %request.key, bytes = request.payload.len(), "Persisted snapshot");
            }
            Err(e) => {
                // In-memory state stays authoritative; the next write reconciles.
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(seq = request.seq, key = %request.key, error = %e, "Failed to persist snapshot");
            }
        }
    }
}
