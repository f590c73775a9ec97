//! Recursive character chunker

use crate::domain::ingestion::{Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

/// Split points in priority order; the trailing empty separator cuts anywhere
const SEPARATORS: &[&str] = &[
    "\n\n", "\n", "。", "！", "？", ". ", "! ", "? ", "；", ";", "，", ",", " ", "",
];

/// Share of each window (from its start) where a split is never placed
const MIN_SPLIT_NUMERATOR: usize = 3;
const MIN_SPLIT_DENOMINATOR: usize = 10;

/// Window-based chunker that backs off to the best separator near the window end
///
/// Offsets in the emitted metadata are char offsets into the sanitized text and
/// cover the trimmed chunk.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterChunker {
    separators: Vec<Vec<char>>,
}

impl Default for RecursiveCharacterChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl RecursiveCharacterChunker {
    pub fn new() -> Self {
        Self {
            separators: SEPARATORS.iter().map(|s| s.chars().collect()).collect(),
        }
    }

    /// Drop NUL and other control characters except newline, carriage return and tab
    pub fn sanitize(text: &str) -> Vec<char> {
        text.chars()
            .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
            .collect()
    }

    /// End offset of the latest separator starting within `[min_split, end)`, or `end` when none fits
    fn split_point(&self, chars: &[char], min_split: usize, end: usize) -> usize {
        for separator in &self.separators {
            if separator.is_empty() {
                break;
            }

            let len = separator.len();
            if end < len {
                continue;
            }

            let mut pos = end - len;
            loop {
                if pos < min_split {
                    break;
                }
                if chars[pos..pos + len] == separator[..] {
                    return pos + len;
                }
                if pos == 0 {
                    break;
                }
                pos -= 1;
            }
        }

        end
    }

    fn split(&self, chars: &[char], config: &ChunkingConfig) -> Vec<(usize, usize)> {
        let size = config.chunk_size;
        let min_offset = size * MIN_SPLIT_NUMERATOR / MIN_SPLIT_DENOMINATOR;
        let mut ranges = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let mut end = (start + size).min(chars.len());

            if end < chars.len() {
                end = self.split_point(chars, start + min_offset, end);
            }

            let mut lo = start;
            let mut hi = end;
            while lo < hi && chars[lo].is_whitespace() {
                lo += 1;
            }
            while hi > lo && chars[hi - 1].is_whitespace() {
                hi -= 1;
            }
            if lo < hi {
                ranges.push((lo, hi));
            }

            if end >= chars.len() {
                break;
            }

            let next = end.saturating_sub(config.chunk_overlap);
            start = if next <= start { end } else { next };
        }

        ranges
    }
}

impl ChunkingStrategy for RecursiveCharacterChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let chars = Self::sanitize(content);
        let ranges = self.split(&chars, config);
        let total = ranges.len();

        Ok(ranges
            .into_iter()
            .enumerate()
            .map(|(i, (lo, hi))| {
                let text: String = chars[lo..hi].iter().collect();
                Chunk::new(text, ChunkMetadata::new(i, total, lo, hi))
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "recursive_character"
    }
}
