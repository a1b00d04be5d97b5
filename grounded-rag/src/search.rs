//! Vector similarity search over stored chunks.
//!
//! The [`Retriever`] embeds a query, scans the candidate chunks for the
//! requested scope, and ranks them by cosine similarity. This is a linear
//! O(candidates × dimension) scan — appropriate for hundreds to low
//! thousands of chunks per scope; an approximate index (e.g. HNSW) would be
//! the first upgrade if scopes grow beyond that.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use grounded_core::SearchResult;

use crate::config::SearchOptions;
use crate::embedding::EmbeddingProvider;
use crate::encoding::deserialize_embedding;
use crate::error::{Result, RetrievalError};
use crate::store::ChunkStore;

/// Sentinel returned by [`format_search_results`] for an empty result set.
pub const NO_RESULTS_MESSAGE: &str = "No relevant content found.";

/// Compute cosine similarity between two vectors.
///
/// Defined as 0.0 when either vector has zero magnitude (not NaN).
///
/// # Errors
///
/// Returns [`RetrievalError::DimensionMismatch`] if the vectors differ in
/// length. This should never happen with a single embedding model per
/// deployment, but is checked defensively rather than silently truncating.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RetrievalError::DimensionMismatch { left: a.len(), right: b.len() });
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

/// Similarity search over stored chunks.
#[async_trait]
pub trait ChunkSearch: Send + Sync {
    /// Find the chunks most relevant to `query` within the options' scope.
    ///
    /// Results are sorted by descending similarity (ties keep candidate
    /// order), filtered to `min_similarity`, and capped at `limit`. An
    /// empty scope yields an empty vec, not an error.
    async fn find_relevant_chunks(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>>;
}

/// The default [`ChunkSearch`] implementation: embed the query, scan the
/// scoped candidates, rank by cosine similarity.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn ChunkStore>,
}

impl Retriever {
    /// Create a retriever over the given embedding provider and store.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn ChunkStore>) -> Self {
        Self { embedder, store }
    }
}

#[async_trait]
impl ChunkSearch for Retriever {
    async fn find_relevant_chunks(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;
        let candidates = self.store.chunks_in_scope(&options.scope).await?;
        let candidate_count = candidates.len();

        let mut results = Vec::new();
        for candidate in candidates {
            let embedding = deserialize_embedding(&candidate.chunk.embedding)?;
            let similarity = cosine_similarity(&query_embedding, &embedding)?;
            if similarity >= options.min_similarity {
                results.push(SearchResult {
                    chunk_id: candidate.chunk.id,
                    document_id: candidate.chunk.document_id,
                    document_name: candidate.document_name,
                    content: candidate.chunk.content,
                    chunk_index: candidate.chunk.chunk_index,
                    similarity,
                });
            }
        }

        // Stable sort: equal similarities keep candidate order.
        results.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
        results.truncate(options.limit);

        debug!(candidate_count, result_count = results.len(), "similarity search completed");

        Ok(results)
    }
}

/// Render ranked results as a numbered listing for LLM prompt injection.
///
/// Each entry reads `[n] <documentName> (<pct>% match)` followed by the
/// chunk content; entries are separated by a `---` line, omitted when there
/// is exactly one result. An empty slice renders as
/// [`NO_RESULTS_MESSAGE`].
pub fn format_search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            format!(
                "[{}] {} ({}% match)\n{}",
                index + 1,
                result.document_name,
                (result.similarity * 100.0).round() as i64,
                result.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}
