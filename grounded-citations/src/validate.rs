//! Evidence sets and citation validation.
//!
//! The critical correctness property of the grounding pipeline: a citation
//! is trusted only if it references a document/chunk pair that was
//! genuinely present in the retrieval results supplied to the model for
//! that turn. Anything else is dropped from the persisted map — not
//! surfaced as a user error, but not trusted either.

use std::collections::HashSet;

use grounded_core::{Citation, CitationMap, SearchResult};

use crate::map::citation_from_result;
use crate::markers::{CitationMarker, extract_markers};

/// The retrieval evidence supplied to the model for one turn.
///
/// Ranked results deduplicated by chunk id (first occurrence keeps its
/// rank), with a membership index over `(document_id, chunk_id)` pairs.
#[derive(Debug, Clone, Default)]
pub struct EvidenceSet {
    ranked: Vec<SearchResult>,
    keys: HashSet<(String, String)>,
}

impl EvidenceSet {
    /// Create an empty evidence set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an evidence set from ranked search results.
    pub fn from_results(results: Vec<SearchResult>) -> Self {
        let mut evidence = Self::new();
        evidence.extend(results);
        evidence
    }

    /// Append results, skipping chunks already present.
    pub fn extend(&mut self, results: Vec<SearchResult>) {
        for result in results {
            let key = (result.document_id.clone(), result.chunk_id.clone());
            if self.keys.insert(key) {
                self.ranked.push(result);
            }
        }
    }

    /// Whether the given document/chunk pair is in the evidence.
    pub fn contains(&self, document_id: &str, chunk_id: &str) -> bool {
        self.keys.contains(&(document_id.to_string(), chunk_id.to_string()))
    }

    /// Whether any evidence chunk comes from the given document.
    pub fn contains_document(&self, document_id: &str) -> bool {
        self.ranked.iter().any(|result| result.document_id == document_id)
    }

    /// The deduplicated results in rank order.
    pub fn ranked(&self) -> &[SearchResult] {
        &self.ranked
    }

    /// Number of evidence chunks.
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Build a citation map from the ordinal markers in answer text.
///
/// `[n]` resolves to the n-th ranked evidence entry; out-of-range or zero
/// ordinals are dropped, never fabricated. Keys are the marker numbers as
/// strings.
pub fn build_citation_map(answer: &str, evidence: &EvidenceSet) -> CitationMap {
    let mut map = CitationMap::new();

    for marker in extract_markers(answer) {
        let CitationMarker::Ordinal { number } = marker else {
            continue;
        };
        if number == 0 {
            continue;
        }
        if let Some(result) = evidence.ranked().get(number - 1) {
            map.insert(number.to_string(), citation_from_result(result));
        }
    }

    map
}

/// Drop map entries whose referenced evidence was not in the retrieval set.
///
/// Retrieval citations validate by `(document_id, chunk_id)`; synthesis
/// citations carry no chunk id and validate by document membership.
pub fn validate_citation_map(map: CitationMap, evidence: &EvidenceSet) -> CitationMap {
    map.into_inner()
        .into_iter()
        .filter(|(_, citation)| match citation {
            Citation::Retrieval { document_id, chunk_id, .. } => {
                evidence.contains(document_id, chunk_id)
            }
            Citation::Synthesis { document_id, .. } => evidence.contains_document(document_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(document_id: &str, chunk_index: usize, similarity: f32) -> SearchResult {
        SearchResult {
            chunk_id: format!("{document_id}_{chunk_index}"),
            document_id: document_id.to_string(),
            document_name: format!("{document_id}.pdf"),
            content: format!("content {chunk_index}"),
            chunk_index,
            similarity,
        }
    }

    #[test]
    fn evidence_dedupes_by_chunk_keeping_rank() {
        let mut evidence = EvidenceSet::from_results(vec![result("a", 0, 0.9), result("b", 0, 0.8)]);
        evidence.extend(vec![result("a", 0, 0.7), result("c", 0, 0.6)]);

        assert_eq!(evidence.len(), 3);
        assert_eq!(evidence.ranked()[0].document_id, "a");
        assert_eq!(evidence.ranked()[0].similarity, 0.9);
        assert_eq!(evidence.ranked()[2].document_id, "c");
    }

    #[test]
    fn build_map_resolves_in_range_ordinals_only() {
        let evidence = EvidenceSet::from_results(vec![result("a", 0, 0.9), result("b", 1, 0.8)]);
        let map = build_citation_map("Finding [1] and [2], but never [7] or [0].", &evidence);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("1").unwrap().document_id(), "a");
        assert_eq!(map.get("2").unwrap().document_id(), "b");
        assert!(map.get("7").is_none());
        assert!(map.get("0").is_none());
    }

    #[test]
    fn build_map_with_no_evidence_is_empty() {
        let map = build_citation_map("Claims [1] and [2].", &EvidenceSet::new());
        assert!(map.is_empty());
    }

    #[test]
    fn validate_drops_fabricated_retrieval_citations() {
        let evidence = EvidenceSet::from_results(vec![result("a", 0, 0.9)]);

        let mut map = CitationMap::new();
        map.insert("1", citation_from_result(&result("a", 0, 0.9)));
        // References a chunk the model never saw.
        map.insert("2", citation_from_result(&result("z", 4, 0.9)));

        let validated = validate_citation_map(map, &evidence);
        assert_eq!(validated.len(), 1);
        assert!(validated.get("1").is_some());
        assert!(validated.get("2").is_none());
    }

    #[test]
    fn validate_checks_synthesis_citations_by_document() {
        let evidence = EvidenceSet::from_results(vec![result("a", 0, 0.9)]);

        let mut map = CitationMap::new();
        map.insert(
            "1",
            Citation::Synthesis {
                id: "s1".to_string(),
                document_id: "a".to_string(),
                document_name: "a.pdf".to_string(),
                relevant_text: "quoted".to_string(),
                page_number: None,
            },
        );
        map.insert(
            "2",
            Citation::Synthesis {
                id: "s2".to_string(),
                document_id: "never_retrieved".to_string(),
                document_name: "ghost.pdf".to_string(),
                relevant_text: "quoted".to_string(),
                page_number: None,
            },
        );

        let validated = validate_citation_map(map, &evidence);
        assert_eq!(validated.len(), 1);
        assert!(validated.get("1").is_some());
    }
}
