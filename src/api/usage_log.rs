//! Background usage recorder.
//!
//! Handlers enqueue records without waiting on SQLite. A single writer task
//! drains the queue in order. When the queue is full new records are dropped
//! with a warning rather than stalling requests. `flush` waits until every
//! record enqueued before it has been written, and is called on shutdown.

use tokio::sync::{mpsc, oneshot};
use tracing::warn;
use crate::db::Database;

/// Records waiting to be written before new ones are dropped.
pub const USAGE_QUEUE_CAPACITY: usize = 1024;

enum UsageEvent {
    Record { token: String, endpoint: String },
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct UsageLog {
    tx: mpsc::Sender<UsageEvent>,
}

impl UsageLog {
    /// Start the writer task. Must be called inside a tokio runtime.
    pub fn spawn(db: Database) -> Self {
        Self::spawn_with_capacity(db, USAGE_QUEUE_CAPACITY)
    }

    pub fn spawn_with_capacity(db: Database, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        tokio::spawn(run_writer(db, rx));
        Self { tx }
    }

    pub fn record(&self, token: &str, endpoint: impl Into<String>) {
        let event = UsageEvent::Record { token: token.to_string(), endpoint: endpoint.into() };
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(UsageEvent::Record { endpoint, .. })) => {
                warn!(endpoint = %endpoint, "Usage queue full, dropping record");
            }
            Err(_) => warn!("Usage writer stopped, dropping record"),
        }
    }

    /// Wait for every record enqueued so far to reach the database.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(UsageEvent::Flush(done_tx)).await.is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn run_writer(db: Database, mut rx: mpsc::Receiver<UsageEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            UsageEvent::Record { token, endpoint } => {
                let db = db.clone();
                let write = tokio::task::spawn_blocking(move || {
                    db.record_usage(&token, &endpoint).map_err(|e| (endpoint, e))
                });
                match write.await {
                    Ok(Ok(_)) => {}
                    Ok(Err((endpoint, e))) => {
                        warn!(endpoint = %endpoint, error = %e, "Failed to record API usage");
                    }
                    Err(e) => warn!(error = %e, "Usage write task failed"),
                }
            }
            UsageEvent::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
