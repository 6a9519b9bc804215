use crate::error::{CompanionError, Result};
use crate::models::{Chunk, Page};
use std::collections::VecDeque;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Upper bound on chunk length, in characters.
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Tried in order; an empty separator splits into single characters.
    pub separators: Vec<String>,
    /// Keep each separator at the start of the piece that follows it.
    pub keep_separator: bool,
    pub strip_whitespace: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            keep_separator: true,
            strip_whitespace: true,
        }
    }
}

/// Recursive character splitter: prefers paragraph breaks, then line breaks,
/// then spaces, then arbitrary character boundaries.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    pub fn new(config: SplitterConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(CompanionError::Splitting(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if config.chunk_overlap > config.chunk_size {
            return Err(CompanionError::Splitting(format!(
                "chunk overlap ({}) is larger than chunk size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Splits every page on its own, so a chunk never straddles two pages.
    pub fn split_pages(&self, pages: &[Page]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = pages
            .iter()
            .flat_map(|page| {
                self.split_text(&page.text)
                    .into_iter()
                    .map(move |text| Chunk {
                        page: page.index,
                        text,
                    })
            })
            .collect();

        log::info!("Created {} chunks from {} pages", chunks.len(), pages.len());
        chunks
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.config.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let pieces = split_on(text, separator, self.config.keep_separator);
        let merge_separator = if self.config.keep_separator { "" } else { separator };

        let mut chunks = Vec::new();
        let mut small: Vec<&str> = Vec::new();
        for piece in pieces {
            if char_len(piece) < self.config.chunk_size {
                small.push(piece);
                continue;
            }
            if !small.is_empty() {
                chunks.extend(self.merge(&small, merge_separator));
                small.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }
        if !small.is_empty() {
            chunks.extend(self.merge(&small, merge_separator));
        }
        chunks
    }

    /// Packs pieces greedily up to the chunk size. After each emitted chunk,
    /// pieces are dropped from the front until what is left fits in the
    /// overlap and leaves room for the next piece.
    fn merge(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;
        let separator_len = char_len(separator);

        let mut merged = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            let joiner = if current.is_empty() { 0 } else { separator_len };

            if total + len + joiner > size {
                if total > size {
                    log::warn!("Created a chunk of size {total}, which is longer than {size}");
                }
                if !current.is_empty() {
                    if let Some(doc) = self.join(&current, separator) {
                        merged.push(doc);
                    }
                    loop {
                        let joiner = if current.is_empty() { 0 } else { separator_len };
                        let must_shrink =
                            total > overlap || (total + len + joiner > size && total > 0);
                        if !must_shrink {
                            break;
                        }
                        let extra = if current.len() > 1 { separator_len } else { 0 };
                        match current.pop_front() {
                            Some(first) => total = total.saturating_sub(char_len(first) + extra),
                            None => {
                                total = 0;
                                break;
                            }
                        }
                    }
                }
            }

            current.push_back(piece);
            total += len + if current.len() > 1 { separator_len } else { 0 };
        }

        if let Some(doc) = self.join(&current, separator) {
            merged.push(doc);
        }
        merged
    }

    fn join(&self, pieces: &VecDeque<&str>, separator: &str) -> Option<String> {
        let joined = pieces.iter().copied().collect::<Vec<_>>().join(separator);
        let text = if self.config.strip_whitespace {
            joined.trim().to_string()
        } else {
            joined
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn split_on<'a>(text: &'a str, separator: &str, keep_separator: bool) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    if !keep_separator {
        return text.split(separator).filter(|s| !s.is_empty()).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (position, _) in text.match_indices(separator) {
        pieces.push(&text[start..position]);
        start = position;
    }
    pieces.push(&text[start..]);
    pieces.retain(|s| !s.is_empty());
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter() -> TextSplitter {
        TextSplitter::new(SplitterConfig::default()).unwrap()
    }

    fn words(count: usize) -> String {
        (0..count)
            .map(|i| format!("word{i:04}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = splitter().split_text("  Feeling anxious before exams.  ");
        assert_eq!(chunks, vec!["Feeling anxious before exams.".to_string()]);
    }

    #[test]
    fn empty_and_blank_text_yield_nothing() {
        assert!(splitter().split_text("").is_empty());
        assert!(splitter().split_text("   \n\n  ").is_empty());
    }

    #[test]
    fn paragraph_breaks_are_preferred() {
        let text = format!("{}\n\n{}", "a".repeat(600), "b".repeat(600));
        let chunks = splitter().split_text(&text);
        assert_eq!(chunks, vec!["a".repeat(600), "b".repeat(600)]);
    }

    #[test]
    fn chunks_respect_size_and_overlap_neighbours() {
        let text = words(1000);
        let chunks = splitter().split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= DEFAULT_CHUNK_SIZE, "chunk too long");
        }
        for pair in chunks.windows(2) {
            let first_word = pair[1].split(' ').next().unwrap();
            assert!(
                pair[0].contains(first_word),
                "next chunk should start inside the previous one"
            );
            assert_ne!(pair[0], pair[1]);
        }
        assert!(chunks.last().unwrap().ends_with("word0999"));
    }

    #[test]
    fn unbroken_run_falls_back_to_characters() {
        let text = "x".repeat(2500);
        let chunks = splitter().split_text(&text);

        assert_eq!(chunks[0].len(), 1000);
        assert!(chunks.iter().all(|c| c.len() <= 1000));
        // 200 characters carried over into the next chunk
        assert_eq!(chunks[1].len(), 1000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 900);
    }

    #[test]
    fn multibyte_text_is_measured_in_characters() {
        let text = "é".repeat(1500);
        let chunks = splitter().split_text(&text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 1000));
        assert_eq!(chunks[0].chars().count(), 1000);
    }

    #[test]
    fn pages_are_split_independently() {
        let pages = vec![
            Page { index: 0, text: "first page".to_string() },
            Page { index: 1, text: String::new() },
            Page { index: 2, text: "third page".to_string() },
        ];
        let chunks = splitter().split_pages(&pages);
        assert_eq!(
            chunks,
            vec![
                Chunk { page: 0, text: "first page".to_string() },
                Chunk { page: 2, text: "third page".to_string() },
            ]
        );
    }

    #[test]
    fn separator_is_kept_with_following_piece() {
        assert_eq!(split_on("a\nb\nc", "\n", true), vec!["a", "\nb", "\nc"]);
        assert_eq!(split_on("a\nb\nc", "\n", false), vec!["a", "b", "c"]);
        assert_eq!(split_on("\n\na", "\n\n", true), vec!["\n\na"]);
    }

    #[test]
    fn overlap_larger_than_size_is_rejected() {
        let config = SplitterConfig {
            chunk_size: 100,
            chunk_overlap: 200,
            ..SplitterConfig::default()
        };
        let err = TextSplitter::new(config).unwrap_err();
        assert_eq!(err.kind(), "splitting");
    }
}
