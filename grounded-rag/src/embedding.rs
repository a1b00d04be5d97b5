//! Embedding provider trait and batch orchestration.

use async_trait::async_trait;

use crate::error::{Result, RetrievalError};

/// Default per-request item cap for embedding providers.
///
/// Provider-specific configuration, not an invariant; override via
/// [`EmbeddingProvider::max_batch_size`].
pub const DEFAULT_BATCH_LIMIT: usize = 128;

/// Token usage reported by an embedding provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// Total tokens consumed across the request(s).
    pub total_tokens: u64,
}

/// Embeddings for a batch of inputs plus aggregate token usage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingBatch {
    /// One embedding per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    /// Aggregate token usage.
    pub usage: TokenUsage,
}

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap specific embedding backends behind a unified async
/// interface. [`embed_batch`](EmbeddingProvider::embed_batch) is a single
/// provider call and must not be handed more than
/// [`max_batch_size`](EmbeddingProvider::max_batch_size) items; use
/// [`generate_batch_embeddings`] for arbitrarily large input sets.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for one batch of texts in a single provider call.
    async fn embed_batch(&self, texts: &[&str]) -> Result<EmbeddingBatch>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Maximum number of items the provider accepts per request.
    fn max_batch_size(&self) -> usize {
        DEFAULT_BATCH_LIMIT
    }
}

/// Embed an arbitrary number of texts, splitting into provider-sized
/// batches.
///
/// Issues sequential calls of at most
/// [`max_batch_size`](EmbeddingProvider::max_batch_size) items, concatenates
/// the embeddings, and sums token usage. Every returned vector is checked
/// against the provider's dimensionality.
///
/// # Errors
///
/// Any failed batch call aborts the whole operation with a
/// [`RetrievalError::Pipeline`] error ("Batch embedding generation
/// failed: ..."); no partial result is returned. A provider returning the
/// wrong number of vectors, or vectors of the wrong dimensionality, is a
/// hard error.
pub async fn generate_batch_embeddings(
    provider: &dyn EmbeddingProvider,
    texts: &[&str],
) -> Result<EmbeddingBatch> {
    if texts.is_empty() {
        return Ok(EmbeddingBatch::default());
    }

    let limit = provider.max_batch_size().max(1);
    let dimensions = provider.dimensions();

    let mut embeddings = Vec::with_capacity(texts.len());
    let mut total_tokens = 0u64;

    for batch in texts.chunks(limit) {
        let result = provider.embed_batch(batch).await.map_err(|cause| {
            RetrievalError::Pipeline(format!("Batch embedding generation failed: {cause}"))
        })?;

        if result.embeddings.len() != batch.len() {
            return Err(RetrievalError::Pipeline(format!(
                "Batch embedding generation failed: provider returned {} embeddings for {} inputs",
                result.embeddings.len(),
                batch.len()
            )));
        }
        for embedding in &result.embeddings {
            if embedding.len() != dimensions {
                return Err(RetrievalError::DimensionMismatch {
                    left: dimensions,
                    right: embedding.len(),
                });
            }
        }

        embeddings.extend(result.embeddings);
        total_tokens += result.usage.total_tokens;
    }

    Ok(EmbeddingBatch { embeddings, usage: TokenUsage { total_tokens } })
}
