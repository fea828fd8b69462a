//! Single-owner aggregation of parsed records.
//!
//! The [`Index`] lives inside one spawned task for the whole aggregation
//! phase. Producers never touch it directly: they send records through an
//! [`AggregatorHandle`] over a bounded channel, and the owning task applies
//! them one at a time with [`Index::append`]. A full channel suspends the
//! producer instead of dropping the record.

use crate::model::{Index, IndexRecord};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Aggregator is no longer accepting records")]
    Closed,
}

/// Cloneable sending side of the aggregator.
///
/// The aggregator finishes once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct AggregatorHandle {
    tx: mpsc::Sender<IndexRecord>,
}

impl AggregatorHandle {
    /// Queues one observation, waiting for capacity if the buffer is full.
    pub async fn append(
        &self,
        path: impl Into<String>,
        version: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Result<(), AggregateError> {
        self.submit(IndexRecord {
            path: path.into(),
            version: version.into(),
            timestamp: timestamp.into(),
        })
        .await
    }

    pub async fn submit(&self, record: IndexRecord) -> Result<(), AggregateError> {
        self.tx.send(record).await.map_err(|_| AggregateError::Closed)
    }
}

/// Task that owns the [`Index`] while a scrape is running.
pub struct Aggregator {
    rx: mpsc::Receiver<IndexRecord>,
    index: Index,
}

impl Aggregator {
    /// Spawns the aggregator with a record buffer of `capacity` (must be > 0).
    ///
    /// The returned join handle resolves to the finished index after the last
    /// handle is dropped and the buffer is drained.
    pub fn spawn(capacity: usize) -> (AggregatorHandle, JoinHandle<Index>) {
        let (tx, rx) = mpsc::channel(capacity);
        let aggregator = Self {
            rx,
            index: Index::new(),
        };
        (AggregatorHandle { tx }, tokio::spawn(aggregator.run()))
    }

    async fn run(mut self) -> Index {
        let mut appended = 0usize;
        while let Some(record) = self.rx.recv().await {
            self.index
                .append(record.path, record.version, record.timestamp);
            appended += 1;
        }
        debug!(appended, paths = self.index.len(), "Aggregation finished");
        self.index
    }
}
