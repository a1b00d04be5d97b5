//! Building citations from search results.

use grounded_core::{Citation, SearchResult};

/// Maximum excerpt length carried by a retrieval citation, in characters.
pub const EXCERPT_MAX_CHARS: usize = 200;

/// Build a retrieval-kind citation from a search result, truncating the
/// content to an excerpt.
pub fn citation_from_result(result: &SearchResult) -> Citation {
    Citation::Retrieval {
        document_id: result.document_id.clone(),
        document_name: result.document_name.clone(),
        chunk_id: result.chunk_id.clone(),
        content: truncate_excerpt(&result.content, EXCERPT_MAX_CHARS),
        similarity: result.similarity,
        chunk_index: result.chunk_index,
    }
}

/// Truncate text to at most `max_chars` characters, char-safe, appending an
/// ellipsis when anything was cut.
pub fn truncate_excerpt(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let mut excerpt: String = content.chars().take(max_chars).collect();
    excerpt.push('…');
    excerpt
}
