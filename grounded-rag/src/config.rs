//! Configuration for chunking and search.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};
use crate::store::SearchScope;

/// Configuration parameters for text chunking.
///
/// A value object supplied per chunking call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingOptions {
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub overlap_size: usize,
    /// Minimum trimmed length for a chunk to be emitted mid-stream.
    pub min_chunk_size: usize,
    /// Prefer paragraph/sentence/clause boundaries over hard cuts.
    pub preserve_paragraphs: bool,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self { chunk_size: 1000, overlap_size: 200, min_chunk_size: 100, preserve_paragraphs: true }
    }
}

impl ChunkingOptions {
    /// Create a new builder for constructing validated [`ChunkingOptions`].
    pub fn builder() -> ChunkingOptionsBuilder {
        ChunkingOptionsBuilder::default()
    }
}

/// Builder for constructing validated [`ChunkingOptions`].
#[derive(Debug, Clone, Default)]
pub struct ChunkingOptionsBuilder {
    options: ChunkingOptions,
}

impl ChunkingOptionsBuilder {
    /// Set the target chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.options.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn overlap_size(mut self, overlap: usize) -> Self {
        self.options.overlap_size = overlap;
        self
    }

    /// Set the minimum emitted chunk length in characters.
    pub fn min_chunk_size(mut self, min: usize) -> Self {
        self.options.min_chunk_size = min;
        self
    }

    /// Enable or disable boundary-aware splitting.
    pub fn preserve_paragraphs(mut self, preserve: bool) -> Self {
        self.options.preserve_paragraphs = preserve;
        self
    }

    /// Build the [`ChunkingOptions`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if:
    /// - `overlap_size >= chunk_size`
    /// - `min_chunk_size == 0`
    /// - `min_chunk_size > chunk_size`
    pub fn build(self) -> Result<ChunkingOptions> {
        if self.options.overlap_size >= self.options.chunk_size {
            return Err(RetrievalError::Config(format!(
                "overlap_size ({}) must be less than chunk_size ({})",
                self.options.overlap_size, self.options.chunk_size
            )));
        }
        if self.options.min_chunk_size == 0 {
            return Err(RetrievalError::Config("min_chunk_size must be greater than zero".into()));
        }
        if self.options.min_chunk_size > self.options.chunk_size {
            return Err(RetrievalError::Config(format!(
                "min_chunk_size ({}) must not exceed chunk_size ({})",
                self.options.min_chunk_size, self.options.chunk_size
            )));
        }
        Ok(self.options)
    }
}

/// Options for one similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// The study/document scope to search within.
    pub scope: SearchScope,
    /// Maximum number of results to return.
    pub limit: usize,
    /// Minimum cosine similarity for a result to be returned.
    pub min_similarity: f32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOptions {
    /// Default result limit.
    pub const DEFAULT_LIMIT: usize = 5;
    /// Default similarity floor.
    pub const DEFAULT_MIN_SIMILARITY: f32 = 0.1;

    /// Options with the default limit (5) and similarity floor (0.1),
    /// unscoped.
    pub fn new() -> Self {
        Self {
            scope: SearchScope::default(),
            limit: Self::DEFAULT_LIMIT,
            min_similarity: Self::DEFAULT_MIN_SIMILARITY,
        }
    }

    /// Restrict the search to one study.
    pub fn with_study(mut self, study_id: impl Into<String>) -> Self {
        self.scope.study_id = Some(study_id.into());
        self
    }

    /// Restrict the search to a set of documents.
    pub fn with_documents(mut self, document_ids: Vec<String>) -> Self {
        self.scope.document_ids = Some(document_ids);
        self
    }

    /// Set the maximum number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the similarity floor.
    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_defaults() {
        let options = ChunkingOptions::default();
        assert_eq!(options.chunk_size, 1000);
        assert_eq!(options.overlap_size, 200);
        assert_eq!(options.min_chunk_size, 100);
        assert!(options.preserve_paragraphs);
    }

    #[test]
    fn builder_rejects_overlap_at_least_chunk_size() {
        let err = ChunkingOptions::builder().chunk_size(100).overlap_size(100).build().unwrap_err();
        assert!(matches!(err, RetrievalError::Config(_)));
    }

    #[test]
    fn builder_rejects_zero_min_chunk_size() {
        let err = ChunkingOptions::builder().min_chunk_size(0).build().unwrap_err();
        assert!(matches!(err, RetrievalError::Config(_)));
    }

    #[test]
    fn builder_rejects_min_above_chunk_size() {
        let err = ChunkingOptions::builder()
            .chunk_size(200)
            .overlap_size(50)
            .min_chunk_size(201)
            .build()
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Config(_)));
    }

    #[test]
    fn search_options_defaults() {
        let options = SearchOptions::new();
        assert_eq!(options.limit, 5);
        assert_eq!(options.min_similarity, 0.1);
        assert_eq!(options.scope, SearchScope::default());
    }
}
