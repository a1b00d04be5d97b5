//! In-memory chunk store.
//!
//! [`InMemoryChunkStore`] is a reference [`ChunkStore`] backed by
//! `BTreeMap`s behind a `tokio::sync::RwLock`, suitable for development and
//! testing. `BTreeMap` keeps candidate order deterministic, which in turn
//! keeps tie-breaks in search ranking stable.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use grounded_core::DocumentChunk;

use crate::error::{Result, RetrievalError};
use crate::store::{CandidateChunk, ChunkStore, DocumentMeta, SearchScope};

const BACKEND: &str = "InMemory";

/// An in-memory chunk store.
#[derive(Debug, Default)]
pub struct InMemoryChunkStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    documents: BTreeMap<String, DocumentMeta>,
    // document_id -> chunks ordered by chunk_index
    chunks: BTreeMap<String, Vec<DocumentChunk>>,
}

impl InMemoryChunkStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks stored for a document.
    pub async fn chunk_count(&self, document_id: &str) -> usize {
        let inner = self.inner.read().await;
        inner.chunks.get(document_id).map_or(0, Vec::len)
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn upsert_document(&self, document: &DocumentMeta) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.documents.insert(document.document_id.clone(), document.clone());
        Ok(())
    }

    async fn insert_chunks(&self, chunks: &[DocumentChunk]) -> Result<()> {
        let mut inner = self.inner.write().await;
        for chunk in chunks {
            if !inner.documents.contains_key(&chunk.document_id) {
                return Err(RetrievalError::Store {
                    backend: BACKEND.to_string(),
                    message: format!("document '{}' is not registered", chunk.document_id),
                });
            }
            let rows = inner.chunks.entry(chunk.document_id.clone()).or_default();
            rows.push(chunk.clone());
            rows.sort_by_key(|row| row.chunk_index);
        }
        Ok(())
    }

    async fn chunks_in_scope(&self, scope: &SearchScope) -> Result<Vec<CandidateChunk>> {
        let inner = self.inner.read().await;
        let mut candidates = Vec::new();

        for (document_id, meta) in &inner.documents {
            if !scope.matches(document_id, meta.study_id.as_deref()) {
                continue;
            }
            if let Some(rows) = inner.chunks.get(document_id) {
                for chunk in rows {
                    candidates
                        .push(CandidateChunk { document_name: meta.name.clone(), chunk: chunk.clone() });
                }
            }
        }

        Ok(candidates)
    }

    async fn delete_document(&self, document_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.documents.remove(document_id);
        inner.chunks.remove(document_id);
        Ok(())
    }
}
