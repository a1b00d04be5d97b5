//! Boundary-aware text chunking.
//!
//! [`chunk_text`] splits normalized document text into overlapping segments,
//! preferring to cut at paragraph, sentence, line, and clause boundaries
//! over hard character cuts. [`merge_overlapping_chunks`] is a secondary
//! post-pass that coalesces near-duplicate adjacent chunks.
//!
//! All sizes and positions are measured in characters, not bytes, so
//! multibyte text never splits inside a code point.

use std::collections::HashSet;

use grounded_core::TextChunk;

use crate::config::ChunkingOptions;

/// Default Jaccard threshold for [`merge_overlapping_chunks`].
pub const DEFAULT_MERGE_THRESHOLD: f32 = 0.8;

/// Boundary patterns tried in priority order. The first group with a hit in
/// the search window wins; within a group the rightmost hit wins.
const BOUNDARY_GROUPS: [&[&str]; 5] =
    [&["\n\n"], &[". ", "! ", "? "], &["\n"], &[", ", "; "], &[" "]];

/// Split text into overlapping, boundary-aware chunks.
///
/// Line endings are normalized (`\r\n`, `\r` → `\n`) and the text is
/// trimmed before splitting. Text no longer than `chunk_size` characters
/// becomes a single chunk regardless of `min_chunk_size`; the size floor is
/// only enforced mid-stream, where undersized chunks are dropped silently.
/// Chunk indices are sequential from 0 in emission order.
///
/// Deterministic: the same input and options always produce the same
/// output.
pub fn chunk_text(text: &str, options: &ChunkingOptions) -> Vec<TextChunk> {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, plus the end of the text, so
    // char-space positions map to byte-space slices.
    let offsets = char_offsets(&normalized);
    let total_chars = offsets.len() - 1;

    if total_chars <= options.chunk_size {
        return vec![TextChunk { chunk_index: 0, content: normalized }];
    }

    let window = boundary_window(options.chunk_size);
    // Never advance less than min_chunk_size, even with overlap >= size.
    let step = options.chunk_size.saturating_sub(options.overlap_size).max(options.min_chunk_size);

    let mut chunks = Vec::new();
    let mut position = 0;
    while position < total_chars {
        let ideal_end = (position + options.chunk_size).min(total_chars);
        let end = if options.preserve_paragraphs && ideal_end < total_chars {
            find_boundary(&normalized, &offsets, position, ideal_end, window).unwrap_or(ideal_end)
        } else {
            ideal_end
        };

        let content = normalized[offsets[position]..offsets[end]].trim();
        if !content.is_empty() && content.chars().count() >= options.min_chunk_size {
            chunks.push(TextChunk { chunk_index: chunks.len(), content: content.to_string() });
        }

        position += step;
    }

    chunks
}

/// Normalize line endings and trim surrounding whitespace.
fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// Byte offsets of each char boundary, with the text length appended.
fn char_offsets(text: &str) -> Vec<usize> {
    let mut offsets: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
    offsets.push(text.len());
    offsets
}

/// Backward-search window in characters: `min(200, 20% of chunk_size)`.
fn boundary_window(chunk_size: usize) -> usize {
    (chunk_size / 5).min(200)
}

/// Search backward from `ideal_end` for the best boundary cut.
///
/// Returns the char position just after the boundary string, or `None` if
/// no boundary of any priority falls within the window.
fn find_boundary(
    text: &str,
    offsets: &[usize],
    position: usize,
    ideal_end: usize,
    window: usize,
) -> Option<usize> {
    let search_start = ideal_end.saturating_sub(window).max(position + 1);
    if search_start >= ideal_end {
        return None;
    }

    let region_start = offsets[search_start];
    let region = &text[region_start..offsets[ideal_end]];

    for group in BOUNDARY_GROUPS {
        let mut best: Option<usize> = None;
        for pattern in group {
            if let Some(found) = region.rfind(pattern) {
                let cut_byte = region_start + found + pattern.len();
                best = Some(best.map_or(cut_byte, |current| current.max(cut_byte)));
            }
        }
        if let Some(cut_byte) = best {
            // Boundary patterns are ASCII and the region is char-aligned,
            // so the cut lands on a char boundary present in `offsets`.
            let cut = offsets.partition_point(|&offset| offset < cut_byte);
            if cut > position && cut <= ideal_end {
                return Some(cut);
            }
        }
    }

    None
}

/// Coalesce near-duplicate adjacent chunks by word-set Jaccard similarity.
///
/// Adjacent chunks whose similarity meets `threshold` collapse into the
/// longer of the pair. Output is reindexed from 0. A post-processing aid,
/// not part of the primary pipeline.
pub fn merge_overlapping_chunks(chunks: Vec<TextChunk>, threshold: f32) -> Vec<TextChunk> {
    let mut merged: Vec<TextChunk> = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        match merged.last_mut() {
            Some(previous) if jaccard_similarity(&previous.content, &chunk.content) >= threshold => {
                if chunk.content.len() > previous.content.len() {
                    previous.content = chunk.content;
                }
            }
            _ => merged.push(chunk),
        }
    }

    for (index, chunk) in merged.iter_mut().enumerate() {
        chunk.chunk_index = index;
    }

    merged
}

/// Jaccard similarity of the lowercased word sets of two texts.
fn jaccard_similarity(a: &str, b: &str) -> f32 {
    let words_a = word_set(a);
    let words_b = word_set(b);

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.len() + words_b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f32 / union as f32
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase().split_whitespace().map(ToOwned::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(chunk_size: usize, overlap_size: usize, min_chunk_size: usize) -> ChunkingOptions {
        ChunkingOptions { chunk_size, overlap_size, min_chunk_size, preserve_paragraphs: true }
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", &ChunkingOptions::default()).is_empty());
        assert!(chunk_text("   \n\t  ", &ChunkingOptions::default()).is_empty());
    }

    #[test]
    fn short_text_yields_single_chunk_below_min_size() {
        // The size floor is only enforced mid-stream.
        let chunks = chunk_text("short", &ChunkingOptions::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].content, "short");
    }

    #[test]
    fn line_endings_are_normalized() {
        let chunks = chunk_text("alpha\r\nbeta\rgamma", &ChunkingOptions::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "alpha\nbeta\ngamma");
    }

    #[test]
    fn long_text_produces_sequential_indices() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let chunks = chunk_text(&text, &options(200, 50, 20));

        assert!(chunks.len() > 1);
        for (expected, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, expected);
        }
    }

    #[test]
    fn mid_stream_chunks_respect_min_size() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let chunks = chunk_text(&text, &options(200, 50, 20));

        for chunk in &chunks {
            assert!(chunk.content.chars().count() >= 20, "undersized chunk: {:?}", chunk.content);
        }
    }

    #[test]
    fn prefers_paragraph_boundaries() {
        // A paragraph break sits inside the search window; the first chunk
        // should end at it rather than mid-sentence.
        let first = "a".repeat(180);
        let second = "b".repeat(300);
        let text = format!("{first}\n\n{second}");
        let chunks = chunk_text(&text, &options(200, 50, 20));

        assert!(chunks[0].content.chars().all(|c| c == 'a'));
        assert_eq!(chunks[0].content.chars().count(), 180);
    }

    #[test]
    fn falls_back_to_hard_cut_without_boundaries() {
        let text = "x".repeat(500);
        let chunks = chunk_text(&text, &options(200, 50, 20));

        assert!(chunks.len() > 1);
        assert_eq!(chunks[0].content.chars().count(), 200);
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "Sentence one. Sentence two! Sentence three? ".repeat(30);
        let opts = options(200, 50, 20);
        assert_eq!(chunk_text(&text, &opts), chunk_text(&text, &opts));
    }

    #[test]
    fn research_study_scenario() {
        // Scenario A: long mixed-script text, chunk_size=200 / overlap=50.
        let body = "参与者在导航结构中迷失了方向，长文本内容反复出现。 ".repeat(20);
        let text = format!("Research Study findings on navigation. {body}");
        let chunks = chunk_text(&text, &options(200, 50, 20));

        assert!(chunks.len() > 1);
        assert!(chunks[0].content.starts_with("Research Study"));
        for (expected, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, expected);
        }
    }

    #[test]
    fn forward_progress_with_large_overlap() {
        // overlap == chunk_size would stall without the min-step guard.
        let text = "word ".repeat(200);
        let opts = ChunkingOptions {
            chunk_size: 100,
            overlap_size: 100,
            min_chunk_size: 10,
            preserve_paragraphs: false,
        };
        let chunks = chunk_text(&text, &opts);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn merge_collapses_near_duplicates() {
        let chunks = vec![
            TextChunk { chunk_index: 0, content: "the quick brown fox jumps".into() },
            TextChunk { chunk_index: 1, content: "the quick brown fox jumps high".into() },
            TextChunk { chunk_index: 2, content: "an entirely different passage here".into() },
        ];

        let merged = merge_overlapping_chunks(chunks, DEFAULT_MERGE_THRESHOLD);
        assert_eq!(merged.len(), 2);
        // The longer member of the near-duplicate pair survives.
        assert_eq!(merged[0].content, "the quick brown fox jumps high");
        assert_eq!(merged[0].chunk_index, 0);
        assert_eq!(merged[1].chunk_index, 1);
    }

    #[test]
    fn merge_keeps_distinct_chunks() {
        let chunks = vec![
            TextChunk { chunk_index: 0, content: "alpha beta gamma".into() },
            TextChunk { chunk_index: 1, content: "delta epsilon zeta".into() },
        ];
        let merged = merge_overlapping_chunks(chunks.clone(), DEFAULT_MERGE_THRESHOLD);
        assert_eq!(merged, chunks);
    }

    #[test]
    fn jaccard_basics() {
        assert_eq!(jaccard_similarity("a b c", "a b c"), 1.0);
        assert_eq!(jaccard_similarity("a b", "c d"), 0.0);
        assert_eq!(jaccard_similarity("", ""), 0.0);
        // Case-insensitive.
        assert_eq!(jaccard_similarity("Fox Jumps", "fox jumps"), 1.0);
    }
}
