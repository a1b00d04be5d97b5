//! Batch ingestion with bounded concurrency.
//!
//! [`BatchIngester`] processes a batch of uploaded files with at most
//! [`DEFAULT_MAX_IN_FLIGHT`] documents in flight, bounding embedding-provider
//! load and buffered file memory. Per-user activity is tracked through an
//! injected [`ConcurrencyGauge`] so the in-memory implementation can be
//! swapped for a distributed limiter without touching call sites.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::{Mutex, Semaphore};
use tracing::{info, warn};

use grounded_core::{DocumentChunk, DocumentSource};

use crate::error::{Result, RetrievalError};
use crate::pipeline::IngestionPipeline;

/// Default number of files processed concurrently within one batch.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 3;

/// Per-user batch activity accounting.
///
/// A soft fairness limit, not a correctness invariant: counts are
/// process-local and not durable across restarts.
#[async_trait]
pub trait ConcurrencyGauge: Send + Sync {
    /// Record a batch starting for the user; returns the active count.
    async fn begin(&self, user_id: &str) -> usize;

    /// Record a batch finishing for the user.
    async fn end(&self, user_id: &str);

    /// Current active batch count for the user.
    async fn active(&self, user_id: &str) -> usize;
}

/// Process-local [`ConcurrencyGauge`] backed by a mutex-guarded map.
///
/// Zero entries are removed so the map doesn't grow with user churn.
#[derive(Debug, Default)]
pub struct InMemoryGauge {
    counts: Mutex<HashMap<String, usize>>,
}

impl InMemoryGauge {
    /// Create a new gauge with no active users.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConcurrencyGauge for InMemoryGauge {
    async fn begin(&self, user_id: &str) -> usize {
        let mut counts = self.counts.lock().await;
        let count = counts.entry(user_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    async fn end(&self, user_id: &str) {
        let mut counts = self.counts.lock().await;
        if let Some(count) = counts.get_mut(user_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                counts.remove(user_id);
            }
        }
    }

    async fn active(&self, user_id: &str) -> usize {
        let counts = self.counts.lock().await;
        counts.get(user_id).copied().unwrap_or(0)
    }
}

/// Ingests batches of uploads with a bounded concurrency window.
pub struct BatchIngester {
    pipeline: Arc<IngestionPipeline>,
    gauge: Arc<dyn ConcurrencyGauge>,
    max_in_flight: usize,
}

impl BatchIngester {
    /// Create a batch ingester with the default in-flight cap.
    pub fn new(pipeline: Arc<IngestionPipeline>, gauge: Arc<dyn ConcurrencyGauge>) -> Self {
        Self { pipeline, gauge, max_in_flight: DEFAULT_MAX_IN_FLIGHT }
    }

    /// Override the number of files processed concurrently.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Ingest a batch of files for one user.
    ///
    /// Files are processed concurrently (bounded by the in-flight cap) and
    /// may complete in any order; results are returned in submission order,
    /// one per file, so a failed file never aborts its siblings. The user's
    /// gauge is incremented for the duration of the batch regardless of
    /// outcome.
    pub async fn ingest_batch(
        &self,
        user_id: &str,
        sources: &[DocumentSource],
    ) -> Vec<Result<Vec<DocumentChunk>>> {
        let active = self.gauge.begin(user_id).await;
        info!(user_id, files = sources.len(), active_batches = active, "batch ingestion started");

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let tasks = sources.iter().map(|source| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|_| RetrievalError::Pipeline("ingestion slot closed".to_string()))?;
                self.pipeline.ingest(source).await.inspect_err(|e| {
                    warn!(document_id = %source.document_id, error = %e, "file failed during batch ingestion");
                })
            }
        });

        let results = join_all(tasks).await;
        self.gauge.end(user_id).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(user_id, files = results.len(), failed, "batch ingestion finished");

        results
    }
}
