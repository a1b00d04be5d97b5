//! Document ingestion pipeline.
//!
//! The [`IngestionPipeline`] coordinates extract → chunk → embed → store
//! for one document. Ingestion-time failures are fatal to that document:
//! extraction failure rejects the upload before any chunk or embedding
//! work, and an embedding failure persists nothing.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use grounded_core::{DocumentChunk, DocumentSource};

use crate::chunking::chunk_text;
use crate::config::ChunkingOptions;
use crate::embedding::{EmbeddingProvider, generate_batch_embeddings};
use crate::encoding::serialize_embedding;
use crate::error::{Result, RetrievalError};
use crate::store::{ChunkStore, DocumentMeta};

/// Text extracted from a document by the external extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// The extracted plain text.
    pub text: String,
}

/// The external text-extraction collaborator.
///
/// Implementations fail with [`RetrievalError::Extraction`], carrying a
/// human suggestion for the uploader where one applies (e.g. "may be
/// scanned/image-based").
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from raw document bytes.
    async fn extract(
        &self,
        bytes: &[u8],
        mime_type: &str,
        file_name: &str,
    ) -> Result<ExtractedText>;
}

/// The ingestion pipeline: extract → chunk → embed → store.
///
/// Construct one via [`IngestionPipeline::builder()`].
pub struct IngestionPipeline {
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn ChunkStore>,
    chunking: ChunkingOptions,
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline").field("chunking", &self.chunking).finish_non_exhaustive()
    }
}

impl IngestionPipeline {
    /// Create a new [`IngestionPipelineBuilder`].
    pub fn builder() -> IngestionPipelineBuilder {
        IngestionPipelineBuilder::default()
    }

    /// Return a reference to the chunking options.
    pub fn chunking_options(&self) -> &ChunkingOptions {
        &self.chunking
    }

    /// Ingest a single document.
    ///
    /// Returns the stored chunks. A document whose text chunks to nothing
    /// is registered with zero chunks — not an error.
    ///
    /// # Errors
    ///
    /// Propagates extraction, embedding, and store failures; nothing is
    /// persisted for a document whose embedding step fails.
    pub async fn ingest(&self, source: &DocumentSource) -> Result<Vec<DocumentChunk>> {
        let extracted = self
            .extractor
            .extract(&source.bytes, &source.mime_type, &source.file_name)
            .await
            .inspect_err(|e| {
                error!(document_id = %source.document_id, error = %e, "text extraction failed");
            })?;

        let chunks = chunk_text(&extracted.text, &self.chunking);

        let meta = DocumentMeta {
            document_id: source.document_id.clone(),
            name: source.name.clone(),
            study_id: source.study_id.clone(),
        };

        if chunks.is_empty() {
            self.store.upsert_document(&meta).await?;
            info!(document_id = %source.document_id, chunk_count = 0, "ingested document (empty)");
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let batch = generate_batch_embeddings(self.embedder.as_ref(), &texts).await.inspect_err(
            |e| {
                error!(document_id = %source.document_id, error = %e, "embedding failed during ingestion");
            },
        )?;

        let stored: Vec<DocumentChunk> = chunks
            .into_iter()
            .zip(batch.embeddings)
            .map(|(chunk, embedding)| DocumentChunk {
                id: format!("{}_{}", source.document_id, chunk.chunk_index),
                document_id: source.document_id.clone(),
                chunk_index: chunk.chunk_index,
                content: chunk.content,
                embedding: serialize_embedding(&embedding),
            })
            .collect();

        self.store.upsert_document(&meta).await?;
        self.store.insert_chunks(&stored).await.inspect_err(|e| {
            error!(document_id = %source.document_id, error = %e, "chunk insert failed during ingestion");
        })?;

        info!(
            document_id = %source.document_id,
            chunk_count = stored.len(),
            total_tokens = batch.usage.total_tokens,
            "ingested document"
        );

        Ok(stored)
    }
}

/// Builder for constructing an [`IngestionPipeline`].
///
/// Extractor, embedder, and store are required; chunking options default
/// per [`ChunkingOptions::default`].
#[derive(Default)]
pub struct IngestionPipelineBuilder {
    extractor: Option<Arc<dyn TextExtractor>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn ChunkStore>>,
    chunking: Option<ChunkingOptions>,
}

impl IngestionPipelineBuilder {
    /// Set the text extractor.
    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the chunk store.
    pub fn store(mut self, store: Arc<dyn ChunkStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the chunking options.
    pub fn chunking(mut self, chunking: ChunkingOptions) -> Self {
        self.chunking = Some(chunking);
        self
    }

    /// Build the [`IngestionPipeline`], validating that all required fields
    /// are set.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if any required field is missing.
    pub fn build(self) -> Result<IngestionPipeline> {
        let extractor = self
            .extractor
            .ok_or_else(|| RetrievalError::Config("extractor is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RetrievalError::Config("embedder is required".to_string()))?;
        let store =
            self.store.ok_or_else(|| RetrievalError::Config("store is required".to_string()))?;

        Ok(IngestionPipeline {
            extractor,
            embedder,
            store,
            chunking: self.chunking.unwrap_or_default(),
        })
    }
}
