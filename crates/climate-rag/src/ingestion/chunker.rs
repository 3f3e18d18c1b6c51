//! Text chunking with sentence-boundary awareness

use unicode_segmentation::UnicodeSegmentation;

use crate::types::{Chunk, ChunkSource, Document};

use super::parser::ParsedPdf;

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Minimum chunk size
    min_size: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize, min_size: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            min_size,
        }
    }

    /// Chunk a parsed document
    pub fn chunk_document(&self, doc: &Document, parsed: &ParsedPdf) -> Vec<Chunk> {
        self.chunk_text(&parsed.content, doc, parsed.total_pages)
    }

    /// Chunk text, attaching source information to each piece
    fn chunk_text(&self, text: &str, doc: &Document, page_count: Option<u32>) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let sentences: Vec<&str> = text.split_sentence_bounds().collect();

        let mut current_chunk = String::new();
        let mut current_start = 0usize;
        let mut chunk_index = 0u32;
        let mut char_pos = 0usize;

        for sentence in sentences {
            let sentence_len = sentence.len();

            // Adding this sentence would overflow: flush the current chunk.
            if !current_chunk.is_empty() && current_chunk.len() + sentence_len > self.chunk_size {
                if current_chunk.len() >= self.min_size {
                    chunks.push(Chunk::new(
                        doc.id,
                        current_chunk.trim().to_string(),
                        self.create_source(doc, page_count),
                        current_start,
                        char_pos,
                        chunk_index,
                    ));
                    chunk_index += 1;
                }

                let overlap_text = self.overlap_text(&current_chunk);
                current_chunk = overlap_text;
                current_start = char_pos.saturating_sub(self.overlap);
            }

            current_chunk.push_str(sentence);
            char_pos += sentence_len;
        }

        if current_chunk.trim().len() >= self.min_size {
            chunks.push(Chunk::new(
                doc.id,
                current_chunk.trim().to_string(),
                self.create_source(doc, page_count),
                current_start,
                char_pos,
                chunk_index,
            ));
        }

        chunks
    }

    /// Take the trailing overlap of a flushed chunk as the seed of the next
    fn overlap_text(&self, text: &str) -> String {
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len().saturating_sub(self.overlap);

        // Stay on a UTF-8 character boundary.
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }

        let overlap_text = &text[start..];

        // Prefer restarting at a sentence, then a word.
        if let Some(pos) = overlap_text.find(". ") {
            return overlap_text[pos + 2..].to_string();
        }
        if let Some(pos) = overlap_text.find(' ') {
            return overlap_text[pos + 1..].to_string();
        }

        overlap_text.to_string()
    }

    fn create_source(&self, doc: &Document, page_count: Option<u32>) -> ChunkSource {
        ChunkSource {
            filename: doc.filename.clone(),
            page_number: None,
            page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(
            "plan.pdf".to_string(),
            "stored.pdf".to_string(),
            "hash".to_string(),
            1024,
        )
    }

    fn parsed(content: &str) -> ParsedPdf {
        ParsedPdf {
            content: content.to_string(),
            content_hash: "hash".to_string(),
            total_pages: Some(3),
        }
    }

    #[test]
    fn short_text_becomes_a_single_chunk() {
        let chunker = TextChunker::new(200, 40, 10);
        let chunks = chunker.chunk_document(&doc(), &parsed("The plan targets net zero by 2050."));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "The plan targets net zero by 2050.");
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].source.page_count, Some(3));
    }

    #[test]
    fn long_text_is_split_near_the_target_size() {
        let sentence = "Emissions fall five percent per year under the plan. ";
        let text = sentence.repeat(40);
        let chunker = TextChunker::new(300, 60, 10);
        let chunks = chunker.chunk_document(&doc(), &parsed(&text));

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            // One sentence of slack over the target, never an unbounded chunk.
            assert!(chunk.content.len() <= 300 + sentence.len());
        }
    }

    #[test]
    fn chunk_indexes_are_sequential() {
        let text = "Alpha beta gamma delta. ".repeat(60);
        let chunker = TextChunker::new(120, 20, 10);
        let chunks = chunker.chunk_document(&doc(), &parsed(&text));

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
        }
    }

    #[test]
    fn consecutive_chunks_share_overlap_text() {
        let text = "First sentence here. Second sentence follows. Third sentence ends. \
                    Fourth sentence extends. Fifth sentence closes. Sixth sentence done."
            .to_string();
        let chunker = TextChunker::new(80, 30, 10);
        let chunks = chunker.chunk_document(&doc(), &parsed(&text));

        assert!(chunks.len() >= 2);
        // The head of each later chunk re-states text from its predecessor.
        for pair in chunks.windows(2) {
            let head: String = pair[1].content.chars().take(15).collect();
            assert!(
                pair[0].content.contains(head.trim()) || pair[1].content.len() <= 80,
                "expected overlap between consecutive chunks"
            );
        }
    }

    #[test]
    fn fragments_below_min_size_are_skipped() {
        let chunker = TextChunker::new(200, 40, 50);
        let chunks = chunker.chunk_document(&doc(), &parsed("Too short."));
        assert!(chunks.is_empty());
    }
}
