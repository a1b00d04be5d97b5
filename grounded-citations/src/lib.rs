//! # grounded-citations
//!
//! Citation extraction and validation: binds free-form generated answer
//! text back to verifiable source passages.
//!
//! Two paths produce citations. Structured synthesis emits
//! `{{cite:<id>}}` markers that [`split_with_citations`] resolves against
//! known citations, rendering unmatched markers as visible placeholders.
//! The streaming-chat path emits ordinal `[<n>]` markers that the
//! [`CitationCorrelator`] validates against the retrieval evidence
//! actually supplied to the model for that turn — a citation to a chunk
//! the model never retrieved is never persisted.

pub mod correlate;
pub mod error;
pub mod map;
pub mod markers;
pub mod segments;
pub mod validate;

pub use correlate::{CitationCorrelator, ToolInvocation};
pub use error::{CitationError, Result};
pub use map::{EXCERPT_MAX_CHARS, citation_from_result, truncate_excerpt};
pub use markers::{CitationMarker, MarkerMatch, extract_markers, find_markers};
pub use segments::{AnswerSegment, render_plain, split_with_citations};
pub use validate::{EvidenceSet, build_citation_map, validate_citation_map};
