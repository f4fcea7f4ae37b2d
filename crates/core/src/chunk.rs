//! Overlapping, word-bounded chunking of Markdown.
//!
//! The text is first cut into coarse segments: a cut falls before every ATX
//! heading line and at every paragraph break (a line break followed by one
//! or more blank lines). Segments are then packed greedily into chunks of
//! roughly `target_words` words. When the next segment would overflow a
//! non-empty chunk, the chunk is closed and the next one starts with the
//! closed chunk's last `overlap_words` words.
//!
//! Word counts are whitespace-token counts, tracked while packing and stored
//! as-is on each [`Chunk`].

use std::sync::LazyLock;

use regex::Regex;

use crate::result::Chunk;

/// Paragraph breaks, or a line break directly before a heading (group 1).
static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n(?:[ \t]*\n)+|\n(#{1,6}[ \t])").expect("boundary pattern is valid")
});

/// Chunk sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Soft ceiling on words per chunk.
    pub target_words: usize,
    /// Words carried from the end of one chunk into the start of the next.
    pub overlap_words: usize,
}

impl ChunkConfig {
    pub fn new(target_words: usize, overlap_words: usize) -> Self {
        Self { target_words: target_words.max(1), overlap_words }
    }
}

/// Splits `text` into ordered, overlapping chunks numbered from zero.
pub fn chunk(text: &str, config: &ChunkConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut words = 0usize;

    for segment in segments(text) {
        let segment_words = count_words(segment);
        if segment_words == 0 {
            continue;
        }

        if words > 0 && words + segment_words > config.target_words {
            let overlap = tail_words(&buffer, config.overlap_words);
            emit(&mut chunks, &buffer, words);

            words = overlap.len() + segment_words;
            buffer = if overlap.is_empty() {
                segment.to_string()
            } else {
                format!("{}\n\n{}", overlap.join(" "), segment)
            };
        } else {
            if !buffer.is_empty() {
                buffer.push_str("\n\n");
            }
            buffer.push_str(segment);
            words += segment_words;
        }
    }

    emit(&mut chunks, &buffer, words);
    chunks
}

/// Whitespace-delimited token count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Coarse segments in document order, boundaries removed.
fn segments(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;

    for caps in BOUNDARY.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push(&text[start..whole.start()]);
        start = caps.get(1).map_or(whole.end(), |heading| heading.start());
    }
    out.push(&text[start..]);

    out
}

/// Last `n` words of `text`, in order.
fn tail_words(text: &str, n: usize) -> Vec<&str> {
    if n == 0 {
        return Vec::new();
    }
    let mut tail: Vec<&str> = text.split_whitespace().rev().take(n).collect();
    tail.reverse();
    tail
}

fn emit(chunks: &mut Vec<Chunk>, buffer: &str, words: usize) {
    let text = buffer.trim();
    if text.is_empty() {
        return;
    }
    chunks.push(Chunk { index: chunks.len(), text: text.to_string(), approx_word_count: words });
}
