//! Error types for the `grounded-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval and ingestion operations.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Text could not be extracted from an uploaded document.
    ///
    /// Fatal to that document's processing: the upload is rejected before
    /// any chunk or embedding work begins.
    #[error("Text extraction failed for '{file_name}': {message}")]
    Extraction {
        /// Original file name of the upload.
        file_name: String,
        /// A description of the failure.
        message: String,
        /// A human suggestion for the uploader (e.g. "may be scanned/image-based").
        suggestion: Option<String>,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Two vectors of unequal length were compared.
    ///
    /// Always a defensive programming error: every embedding in a
    /// deployment shares one model's dimensionality.
    #[error("Vectors must have the same length ({left} vs {right})")]
    DimensionMismatch {
        /// Length of the left-hand vector.
        left: usize,
        /// Length of the right-hand vector.
        right: usize,
    },

    /// An error occurred in the chunk store backend.
    #[error("Chunk store error ({backend}): {message}")]
    Store {
        /// The chunk store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A stored embedding could not be decoded.
    #[error("Embedding encoding error: {0}")]
    Encoding(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;
