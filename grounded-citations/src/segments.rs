//! Answer segmentation: splitting generated text on citation markers while
//! preserving the markers.
//!
//! A marker whose id has no matching citation becomes a visible
//! placeholder rather than disappearing — malformed LLM output fails
//! visibly, it is never hidden.

use grounded_core::Citation;

use crate::markers::{CitationMarker, find_markers};

/// One piece of a segmented answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerSegment {
    /// Plain answer text between markers.
    Text(String),
    /// A marker resolved to a known citation.
    Citation {
        /// The marker as it appeared in the text.
        marker: String,
        /// The resolved citation.
        citation: Citation,
    },
    /// A marker with no matching citation; renders as `[<id>]`.
    Unresolved {
        /// The marker as it appeared in the text.
        marker: String,
        /// The unmatched citation id or ordinal.
        id: String,
    },
}

impl AnswerSegment {
    /// The visible placeholder for an unresolved marker.
    pub fn placeholder(id: &str) -> String {
        format!("[{id}]")
    }
}

/// Split answer text on citation markers, resolving each against the given
/// citations.
///
/// Synthesis markers (`{{cite:<id>}}`) match citations by synthesis `id`;
/// ordinal markers (`[<n>]`) match by 1-based position in `citations`.
/// Unmatched markers become [`AnswerSegment::Unresolved`].
pub fn split_with_citations(text: &str, citations: &[Citation]) -> Vec<AnswerSegment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for found in find_markers(text) {
        if found.start > cursor {
            segments.push(AnswerSegment::Text(text[cursor..found.start].to_string()));
        }

        let marker_text = text[found.start..found.end].to_string();
        match resolve(&found.marker, citations) {
            Some(citation) => {
                segments.push(AnswerSegment::Citation { marker: marker_text, citation })
            }
            None => segments.push(AnswerSegment::Unresolved {
                marker: marker_text,
                id: found.marker.key(),
            }),
        }
        cursor = found.end;
    }

    if cursor < text.len() {
        segments.push(AnswerSegment::Text(text[cursor..].to_string()));
    }

    segments
}

fn resolve(marker: &CitationMarker, citations: &[Citation]) -> Option<Citation> {
    match marker {
        CitationMarker::Synthesis { id } => citations
            .iter()
            .find(|citation| matches!(citation, Citation::Synthesis { id: cid, .. } if cid == id))
            .cloned(),
        CitationMarker::Ordinal { number } => {
            if *number == 0 {
                return None;
            }
            citations.get(number - 1).cloned()
        }
    }
}

/// Render segments back to plain text.
///
/// Resolved citations keep their original marker; unresolved markers render
/// as the `[<id>]` placeholder.
pub fn render_plain(segments: &[AnswerSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            AnswerSegment::Text(text) => text.clone(),
            AnswerSegment::Citation { marker, .. } => marker.clone(),
            AnswerSegment::Unresolved { id, .. } => AnswerSegment::placeholder(id),
        })
        .collect()
}
