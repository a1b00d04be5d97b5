//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// An uploaded document handed to the ingestion pipeline.
///
/// Carries the raw file bytes; text extraction happens downstream. Not
/// serializable — it never crosses a wire in this form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    /// Unique identifier for the document.
    pub document_id: String,
    /// The study this document belongs to, if any.
    pub study_id: Option<String>,
    /// Human-readable document name shown in search results and citations.
    pub name: String,
    /// Original file name of the upload.
    pub file_name: String,
    /// MIME type reported by the uploader.
    pub mime_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// A segment of normalized document text produced by the chunker.
///
/// Indices are sequential from 0 in emission order. Embeddings are attached
/// later by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// 0-based, sequential position of this chunk within its document.
    pub chunk_index: usize,
    /// The chunk text, trimmed.
    pub content: String,
}

/// A stored chunk row: content plus its serialized embedding.
///
/// Owned by its parent document, immutable after ingestion, and deleted
/// with the document (cascade). The chunk id is
/// `{document_id}_{chunk_index}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentChunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The ID of the parent document.
    pub document_id: String,
    /// 0-based, sequential position within the parent document.
    pub chunk_index: usize,
    /// The chunk text. Non-empty.
    pub content: String,
    /// The chunk's embedding as little-endian f32 bytes, 4 per component.
    pub embedding: Vec<u8>,
}

/// A retrieved chunk with its similarity to the query.
///
/// Transient — derived per query, never persisted. Serialized with
/// camelCase field names for the JavaScript client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// ID of the matching chunk.
    pub chunk_id: String,
    /// ID of the chunk's parent document.
    pub document_id: String,
    /// Human-readable name of the parent document.
    pub document_name: String,
    /// The chunk text.
    pub content: String,
    /// 0-based position of the chunk within its document.
    pub chunk_index: usize,
    /// Cosine similarity to the query, in [-1, 1].
    pub similarity: f32,
}
