//! Tool-call re-correlation.
//!
//! After the LLM finishes a turn, the tool calls it made are re-correlated
//! with the search results those calls would have returned, by re-running
//! each query against the same scope. The answer's citation markers are
//! then resolved against that re-derived evidence, so the model cannot
//! fabricate a citation to a document it never actually retrieved.
//!
//! Re-running is needed because tool outputs cross the LLM boundary as
//! opaque strings. A host that retains the structured results can skip it:
//! build an [`EvidenceSet`] directly and call
//! [`build_citation_map`](crate::validate::build_citation_map).

use std::sync::Arc;

use tracing::{debug, warn};

use grounded_core::CitationMap;
use grounded_rag::{ChunkSearch, SearchOptions};

use crate::validate::{EvidenceSet, build_citation_map};

/// One tool call from a finished LLM turn: the query it ran and the
/// serialized output string the model saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// The search query the tool call carried.
    pub query: String,
    /// The tool output as serialized for the model.
    pub output: String,
}

impl ToolInvocation {
    /// Convenience constructor.
    pub fn new(query: impl Into<String>, output: impl Into<String>) -> Self {
        Self { query: query.into(), output: output.into() }
    }
}

/// Re-correlates a turn's tool calls with retrieval evidence and builds the
/// validated citation map.
pub struct CitationCorrelator {
    search: Arc<dyn ChunkSearch>,
    options: SearchOptions,
}

impl CitationCorrelator {
    /// Create a correlator over the same search and options the tool calls
    /// used.
    pub fn new(search: Arc<dyn ChunkSearch>, options: SearchOptions) -> Self {
        Self { search, options }
    }

    /// Re-run each invocation's query and union the results into one
    /// evidence set.
    ///
    /// A failed re-run is logged and that tool call's citations are simply
    /// omitted; the remaining invocations still contribute.
    pub async fn collect_evidence(&self, invocations: &[ToolInvocation]) -> EvidenceSet {
        let mut evidence = EvidenceSet::new();

        for invocation in invocations {
            match self.search.find_relevant_chunks(&invocation.query, &self.options).await {
                Ok(results) => {
                    debug!(
                        query = %invocation.query,
                        result_count = results.len(),
                        "correlated tool call with retrieval results"
                    );
                    evidence.extend(results);
                }
                Err(e) => {
                    warn!(
                        query = %invocation.query,
                        error = %e,
                        "citation correlation failed; skipping tool call"
                    );
                }
            }
        }

        evidence
    }

    /// Build the validated citation map for a finished turn.
    ///
    /// Collects evidence from the invocations, then resolves the answer's
    /// citation markers against it. Markers referencing anything outside
    /// the evidence are dropped.
    pub async fn extract(&self, answer: &str, invocations: &[ToolInvocation]) -> CitationMap {
        let evidence = self.collect_evidence(invocations).await;
        let map = build_citation_map(answer, &evidence);
        debug!(
            evidence_chunks = evidence.len(),
            citations = map.len(),
            "extracted citation map"
        );
        map
    }
}
