//! # grounded-core
//!
//! Shared data types for the grounded retrieval-and-citation pipeline.
//!
//! This crate defines the document, chunk, and search-result types produced
//! by `grounded-rag`, plus the [`Citation`] union and [`CitationMap`] that
//! `grounded-citations` attaches to generated answers. It is a pure-types
//! crate: no I/O, no async, no policy.

pub mod chunk;
pub mod citation;

pub use chunk::{DocumentChunk, DocumentSource, SearchResult, TextChunk};
pub use citation::{Citation, CitationMap};
