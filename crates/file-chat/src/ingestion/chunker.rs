//! Sentence-aware text chunking for summarization of long content

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks in characters
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size / 2),
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split text into chunks of at most `chunk_size` characters.
    ///
    /// Chunks end on sentence boundaries where possible; each chunk after the
    /// first starts with up to `overlap` characters from the end of the previous
    /// one. Deterministic for a given input.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for piece in self.pieces(text) {
            let piece_len = piece.chars().count();

            if current_len > 0 && current_len + piece_len > self.chunk_size {
                let finished = std::mem::take(&mut current);
                current = self.get_overlap_text(&finished);
                current_len = current.chars().count();
                Self::push_chunk(&mut chunks, finished);

                // Overlap must never push a piece over the limit
                if current_len + piece_len > self.chunk_size {
                    current.clear();
                    current_len = 0;
                }
            }

            current.push_str(piece);
            current_len += piece_len;
        }

        Self::push_chunk(&mut chunks, current);
        chunks
    }

    fn push_chunk(chunks: &mut Vec<String>, chunk: String) {
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
    }

    /// Sentences, with any sentence longer than a chunk cut on char boundaries
    fn pieces<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();

        for sentence in text.split_sentence_bounds() {
            if sentence.chars().count() <= self.chunk_size {
                pieces.push(sentence);
                continue;
            }

            let mut rest = sentence;
            while !rest.is_empty() {
                let cut = rest
                    .char_indices()
                    .nth(self.chunk_size)
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                let (head, tail) = rest.split_at(cut);
                pieces.push(head);
                rest = tail;
            }
        }

        pieces
    }

    /// Get overlap text from the end of a chunk, starting at a word boundary
    fn get_overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }

        let total = text.chars().count();
        if total <= self.overlap {
            return text.to_string();
        }

        let start = text
            .char_indices()
            .nth(total - self.overlap)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let overlap_text = text[start..].trim_end();

        // Try to start at a sentence boundary, then fall back to a word boundary
        let tail = if let Some(pos) = overlap_text.find(". ") {
            &overlap_text[pos + 2..]
        } else if let Some(pos) = overlap_text.find(' ') {
            &overlap_text[pos + 1..]
        } else {
            overlap_text
        };

        if tail.is_empty() {
            String::new()
        } else {
            format!("{} ", tail)
        }
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        let chunker = TextChunker::new(100, 10);
        assert_eq!(chunker.split_text("One sentence. Two."), vec!["One sentence. Two."]);
    }

    #[test]
    fn test_empty_text() {
        assert!(TextChunker::new(100, 10).split_text("   ").is_empty());
    }

    #[test]
    fn test_chunks_respect_size() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(200);
        let chunker = TextChunker::new(500, 50);
        let chunks = chunker.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 500, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn test_overlap_carries_text() {
        let text = "Alpha beta gamma. Delta epsilon zeta. Eta theta iota. Kappa lambda mu.";
        let chunker = TextChunker::new(40, 20);
        let chunks = chunker.split_text(text);

        assert!(chunks.len() >= 2);
        let last_words_of_first: Vec<&str> = chunks[0].split_whitespace().rev().take(1).collect();
        assert!(chunks[1].contains(last_words_of_first[0]));
    }

    #[test]
    fn test_long_sentence_is_cut() {
        let text = "x".repeat(2500);
        let chunker = TextChunker::new(1000, 0);
        let chunks = chunker.split_text(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 500);
    }

    #[test]
    fn test_multibyte_boundaries() {
        let text = "नमस्ते दुनिया। ".repeat(300);
        let chunks = TextChunker::new(200, 30).split_text(&text);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 200);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "Some text here. ".repeat(500);
        let chunker = TextChunker::default();
        assert_eq!(chunker.split_text(&text), chunker.split_text(&text));
    }
}
