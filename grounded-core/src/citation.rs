//! Citation types: the tagged [`Citation`] union and the persisted
//! [`CitationMap`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A resolved citation attached to a generated answer.
///
/// Two sourcing paths produce citations: similarity-search retrieval and
/// structured synthesis. They are variants of one concept, so they share a
/// tagged representation (`kind` = `"retrieval"` | `"synthesis"`) on the
/// wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Citation {
    /// A citation backed by a retrieved chunk.
    #[serde(rename_all = "camelCase")]
    Retrieval {
        /// ID of the cited document.
        document_id: String,
        /// Human-readable name of the cited document.
        document_name: String,
        /// ID of the cited chunk.
        chunk_id: String,
        /// Truncated excerpt of the chunk content.
        content: String,
        /// Similarity of the chunk to the query that retrieved it.
        similarity: f32,
        /// Position of the chunk within its document.
        chunk_index: usize,
    },
    /// A citation emitted by structured synthesis.
    #[serde(rename_all = "camelCase")]
    Synthesis {
        /// The citation id referenced by `{{cite:<id>}}` markers.
        id: String,
        /// ID of the cited document.
        document_id: String,
        /// Human-readable name of the cited document.
        document_name: String,
        /// The passage the synthesis step attributed to this document.
        relevant_text: String,
        /// Page number within the source document, when known.
        #[serde(skip_serializing_if = "Option::is_none")]
        page_number: Option<u32>,
    },
}

impl Citation {
    /// The document this citation points at.
    pub fn document_id(&self) -> &str {
        match self {
            Citation::Retrieval { document_id, .. } => document_id,
            Citation::Synthesis { document_id, .. } => document_id,
        }
    }

    /// The cited chunk id, for retrieval citations.
    pub fn chunk_id(&self) -> Option<&str> {
        match self {
            Citation::Retrieval { chunk_id, .. } => Some(chunk_id),
            Citation::Synthesis { .. } => None,
        }
    }
}

/// The persisted mapping from 1-based citation number (string key) to
/// citation data for one chat message.
///
/// Created at answer-generation time, immutable once the message is saved.
/// Serializes transparently as a JSON object, `{}` when empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CitationMap(BTreeMap<String, Citation>);

impl CitationMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a citation under the given key, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, citation: Citation) {
        self.0.insert(key.into(), citation);
    }

    /// Look up a citation by key.
    pub fn get(&self, key: &str) -> Option<&Citation> {
        self.0.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Citation)> {
        self.0.iter()
    }

    /// Consume the map, returning the underlying entries.
    pub fn into_inner(self) -> BTreeMap<String, Citation> {
        self.0
    }
}

impl FromIterator<(String, Citation)> for CitationMap {
    fn from_iter<I: IntoIterator<Item = (String, Citation)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retrieval_citation() -> Citation {
        Citation::Retrieval {
            document_id: "doc_1".into(),
            document_name: "ux.pdf".into(),
            chunk_id: "doc_1_2".into(),
            content: "Users struggled with navigation.".into(),
            similarity: 0.91,
            chunk_index: 2,
        }
    }

    #[test]
    fn citation_tagged_by_kind() {
        let json = serde_json::to_value(retrieval_citation()).unwrap();
        assert_eq!(json["kind"], "retrieval");
        assert_eq!(json["documentId"], "doc_1");
        assert_eq!(json["chunkId"], "doc_1_2");

        let synthesis = Citation::Synthesis {
            id: "doc_1".into(),
            document_id: "doc_1".into(),
            document_name: "ux.pdf".into(),
            relevant_text: "navigation issues".into(),
            page_number: None,
        };
        let json = serde_json::to_value(&synthesis).unwrap();
        assert_eq!(json["kind"], "synthesis");
        assert!(json.get("pageNumber").is_none());
    }

    #[test]
    fn empty_map_serializes_to_empty_object() {
        let map = CitationMap::new();
        assert_eq!(serde_json::to_string(&map).unwrap(), "{}");
    }

    #[test]
    fn map_round_trips() {
        let mut map = CitationMap::new();
        map.insert("1", retrieval_citation());

        let json = serde_json::to_string(&map).unwrap();
        let back: CitationMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
        assert_eq!(back.get("1").unwrap().document_id(), "doc_1");
    }
}
