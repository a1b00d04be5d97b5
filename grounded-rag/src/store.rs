//! Chunk store trait for persisting and reading embedded chunks.

use async_trait::async_trait;

use grounded_core::DocumentChunk;

use crate::error::Result;

/// Document metadata registered alongside its chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    /// Unique identifier for the document.
    pub document_id: String,
    /// Human-readable document name.
    pub name: String,
    /// The study this document belongs to, if any.
    pub study_id: Option<String>,
}

/// The study/document scope of a search. Both filters are optional and
/// conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchScope {
    /// Restrict to documents belonging to this study.
    pub study_id: Option<String>,
    /// Restrict to this set of document ids.
    pub document_ids: Option<Vec<String>>,
}

impl SearchScope {
    /// Whether a document with the given id and study matches this scope.
    pub fn matches(&self, document_id: &str, study_id: Option<&str>) -> bool {
        if let Some(scope_study) = &self.study_id {
            if study_id != Some(scope_study.as_str()) {
                return false;
            }
        }
        if let Some(ids) = &self.document_ids {
            if !ids.iter().any(|id| id == document_id) {
                return false;
            }
        }
        true
    }
}

/// A scoped read row: a stored chunk joined with its document name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateChunk {
    /// Human-readable name of the chunk's document.
    pub document_name: String,
    /// The stored chunk, embedding bytes included.
    pub chunk: DocumentChunk,
}

/// A storage backend for embedded chunks.
///
/// Implementations persist `{document_id, chunk_index, content, embedding}`
/// rows and support scoped reads by study/document id set. Deleting a
/// document cascades to its chunks.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Register or update a document's metadata.
    async fn upsert_document(&self, document: &DocumentMeta) -> Result<()>;

    /// Insert chunks for previously registered documents.
    async fn insert_chunks(&self, chunks: &[DocumentChunk]) -> Result<()>;

    /// Read all chunks within the given scope, joined with document names.
    async fn chunks_in_scope(&self, scope: &SearchScope) -> Result<Vec<CandidateChunk>>;

    /// Delete a document and all of its chunks.
    async fn delete_document(&self, document_id: &str) -> Result<()>;
}
