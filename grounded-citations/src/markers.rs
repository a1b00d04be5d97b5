//! Citation marker parsing.
//!
//! Two wire formats appear in generated answer text: `{{cite:<id>}}`
//! emitted by structured synthesis, and bracketed ordinals `[<n>]` keyed
//! into a CitationMap by the string of `n`.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `{{cite:<id>}}` (group 1) or `[<n>]` (group 2).
static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"\{\{cite:([A-Za-z0-9_.-]+)\}\}|\[(\d+)\]") {
        Ok(regex) => regex,
        Err(err) => panic!("Citation marker regex is invalid: {err}"),
    });

/// An inline citation marker found in answer text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationMarker {
    /// A `{{cite:<id>}}` marker from structured synthesis.
    Synthesis {
        /// The referenced citation id.
        id: String,
    },
    /// A bracketed 1-based ordinal `[<n>]`.
    Ordinal {
        /// The citation number.
        number: usize,
    },
}

impl CitationMarker {
    /// The key this marker would use in a CitationMap.
    pub fn key(&self) -> String {
        match self {
            CitationMarker::Synthesis { id } => id.clone(),
            CitationMarker::Ordinal { number } => number.to_string(),
        }
    }
}

/// A marker together with its span in the answer text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    /// The parsed marker.
    pub marker: CitationMarker,
    /// Byte offset of the marker's first character.
    pub start: usize,
    /// Byte offset just past the marker's last character.
    pub end: usize,
}

/// Extract all citation markers from answer text, in document order.
pub fn extract_markers(text: &str) -> Vec<CitationMarker> {
    find_markers(text).into_iter().map(|m| m.marker).collect()
}

/// Extract all citation markers with their spans, in document order.
pub fn find_markers(text: &str) -> Vec<MarkerMatch> {
    MARKER_REGEX
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let marker = if let Some(id) = captures.get(1) {
                CitationMarker::Synthesis { id: id.as_str().to_string() }
            } else {
                let number = captures.get(2)?.as_str().parse().ok()?;
                CitationMarker::Ordinal { number }
            };
            Some(MarkerMatch { marker, start: whole.start(), end: whole.end() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_synthesis_markers() {
        let markers = extract_markers("Users struggled {{cite:doc_1}} with navigation.");
        assert_eq!(markers, vec![CitationMarker::Synthesis { id: "doc_1".to_string() }]);
    }

    #[test]
    fn extracts_ordinal_markers_in_order() {
        let markers = extract_markers("First point [1], second [3], third [2].");
        assert_eq!(
            markers,
            vec![
                CitationMarker::Ordinal { number: 1 },
                CitationMarker::Ordinal { number: 3 },
                CitationMarker::Ordinal { number: 2 },
            ]
        );
    }

    #[test]
    fn extracts_mixed_markers() {
        let markers = extract_markers("See {{cite:ux.pdf-3}} and [2].");
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0], CitationMarker::Synthesis { id: "ux.pdf-3".to_string() });
        assert_eq!(markers[1], CitationMarker::Ordinal { number: 2 });
    }

    #[test]
    fn ignores_non_numeric_brackets_and_plain_text() {
        assert!(extract_markers("no markers here [abc] {{cite:}}").is_empty());
    }

    #[test]
    fn marker_keys_match_citation_map_keys() {
        assert_eq!(CitationMarker::Ordinal { number: 2 }.key(), "2");
        assert_eq!(CitationMarker::Synthesis { id: "doc_1".into() }.key(), "doc_1");
    }

    #[test]
    fn spans_cover_the_whole_marker() {
        let text = "a {{cite:x}} b";
        let found = find_markers(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].start..found[0].end], "{{cite:x}}");
    }
}
