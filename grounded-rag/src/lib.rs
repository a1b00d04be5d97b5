//! # grounded-rag
//!
//! Chunking, embedding, and vector similarity search for document-grounded
//! chat.
//!
//! The ingestion path turns uploaded documents into stored chunk+embedding
//! rows: extract → [`chunk_text`] → [`generate_batch_embeddings`] →
//! [`serialize_embedding`] → [`ChunkStore`]. At query time the
//! [`Retriever`] embeds the query and ranks the scoped candidates by
//! cosine similarity; [`RetrievalTool`] exposes that search to an external
//! LLM layer with graceful degradation on failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use grounded_rag::{
//!     ChunkingOptions, IngestionPipeline, InMemoryChunkStore, Retriever, SearchOptions,
//! };
//!
//! let store = Arc::new(InMemoryChunkStore::new());
//! let pipeline = IngestionPipeline::builder()
//!     .extractor(extractor)
//!     .embedder(Arc::clone(&embedder))
//!     .store(Arc::clone(&store) as _)
//!     .chunking(ChunkingOptions::default())
//!     .build()?;
//!
//! pipeline.ingest(&upload).await?;
//!
//! let retriever = Retriever::new(embedder, store);
//! let results = retriever
//!     .find_relevant_chunks("navigation problems", &SearchOptions::new())
//!     .await?;
//! ```

pub mod batch;
pub mod chunking;
pub mod config;
pub mod embedding;
pub mod encoding;
pub mod error;
pub mod inmemory;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
pub mod search;
pub mod store;
pub mod tool;

pub use batch::{BatchIngester, ConcurrencyGauge, DEFAULT_MAX_IN_FLIGHT, InMemoryGauge};
pub use chunking::{DEFAULT_MERGE_THRESHOLD, chunk_text, merge_overlapping_chunks};
pub use config::{ChunkingOptions, ChunkingOptionsBuilder, SearchOptions};
pub use embedding::{
    DEFAULT_BATCH_LIMIT, EmbeddingBatch, EmbeddingProvider, TokenUsage, generate_batch_embeddings,
};
pub use encoding::{deserialize_embedding, serialize_embedding};
pub use error::{Result, RetrievalError};
pub use inmemory::InMemoryChunkStore;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use pipeline::{ExtractedText, IngestionPipeline, IngestionPipelineBuilder, TextExtractor};
pub use search::{
    ChunkSearch, NO_RESULTS_MESSAGE, Retriever, cosine_similarity, format_search_results,
};
pub use store::{CandidateChunk, ChunkStore, DocumentMeta, SearchScope};
pub use tool::{DEFAULT_RETRIEVAL_TIMEOUT, RetrievalTool};
