//! Error types for the `grounded-citations` crate.

use thiserror::Error;

use grounded_rag::RetrievalError;

/// Errors that can occur while extracting or validating citations.
#[derive(Debug, Error)]
pub enum CitationError {
    /// Re-running a search to validate a tool call's citations failed.
    ///
    /// Logged and skipped by the correlator; never aborts persistence of
    /// the rest of the message.
    #[error("Citation correlation failed for query '{query}': {message}")]
    Correlation {
        /// The tool call's search query.
        query: String,
        /// A description of the failure.
        message: String,
    },

    /// An error propagated from `grounded-rag`.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

/// A convenience result type for citation operations.
pub type Result<T> = std::result::Result<T, CitationError>;
