//! Document ingestion: PDF parsing and text chunking

pub mod chunker;
pub mod parser;

pub use chunker::TextChunker;
pub use parser::{ParsedPdf, PdfParser};

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::{Chunk, Document};

/// Parse-then-chunk pipeline with the configured chunking parameters
pub struct IngestPipeline {
    chunker: TextChunker,
}

impl IngestPipeline {
    /// Create a pipeline from the chunking configuration
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunker: TextChunker::new(
                config.chunk_size,
                config.chunk_overlap,
                config.min_chunk_size,
            ),
        }
    }

    /// Extract text from PDF bytes
    pub fn parse_pdf(&self, filename: &str, data: &[u8]) -> Result<ParsedPdf> {
        PdfParser::parse(filename, data)
    }

    /// Chunk a parsed document
    pub fn create_chunks(&self, doc: &Document, parsed: &ParsedPdf) -> Vec<Chunk> {
        self.chunker.chunk_document(doc, parsed)
    }
}
