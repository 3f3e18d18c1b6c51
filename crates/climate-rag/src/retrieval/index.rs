//! Per-document in-memory vector index
//!
//! The index is owned by one session, built from scratch on every upload
//! and discarded with the session. A flat cosine scan is the right tool at
//! this scale (one document, tens to hundreds of chunks); there is no
//! persistence and no ANN structure.

use crate::error::{Error, Result};
use crate::types::Chunk;

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (-1.0 to 1.0, higher is better)
    pub similarity: f32,
}

/// In-memory vector index over the chunks of a single document
#[derive(Debug, Default)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    dimensions: usize,
}

impl VectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from embedded chunks.
    ///
    /// Every chunk must carry an embedding, and all embeddings must share
    /// one dimension.
    pub fn build(chunks: Vec<Chunk>) -> Result<Self> {
        let mut index = Self::new();
        for chunk in chunks {
            index.insert(chunk)?;
        }
        Ok(index)
    }

    /// Insert an embedded chunk
    pub fn insert(&mut self, chunk: Chunk) -> Result<()> {
        if chunk.embedding.is_empty() {
            return Err(Error::Internal(format!(
                "Chunk {} has no embedding",
                chunk.id
            )));
        }

        if self.chunks.is_empty() {
            self.dimensions = chunk.embedding.len();
        } else if chunk.embedding.len() != self.dimensions {
            return Err(Error::Internal(format!(
                "Embedding dimension mismatch: index has {}, chunk {} has {}",
                self.dimensions,
                chunk.id,
                chunk.embedding.len()
            )));
        }

        self.chunks.push(chunk);
        Ok(())
    }

    /// Search for the `top_k` most similar chunks
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .chunks
            .iter()
            .map(|chunk| SearchResult {
                similarity: cosine_similarity(query_embedding, &chunk.embedding),
                chunk: chunk.clone(),
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        results
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Cosine similarity between two vectors; zero when either has no norm or
/// the dimensions disagree.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkSource};
    use uuid::Uuid;

    fn chunk(content: &str, embedding: Vec<f32>) -> Chunk {
        let mut c = Chunk::new(
            Uuid::new_v4(),
            content.to_string(),
            ChunkSource {
                filename: "plan.pdf".to_string(),
                page_number: None,
                page_count: None,
            },
            0,
            content.len(),
            0,
        );
        c.embedding = embedding;
        c
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.3, 0.5, 0.2];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_handles_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn search_orders_by_similarity_and_truncates() {
        let index = VectorIndex::build(vec![
            chunk("far", vec![0.0, 1.0]),
            chunk("near", vec![1.0, 0.05]),
            chunk("nearest", vec![1.0, 0.0]),
        ])
        .unwrap();

        let results = index.search(&[1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "nearest");
        assert_eq!(results[1].chunk.content, "near");
        assert!(results[0].similarity >= results[1].similarity);
    }

    #[test]
    fn search_on_empty_index_returns_nothing() {
        let index = VectorIndex::new();
        assert!(index.search(&[1.0, 0.0], 4).is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn insert_rejects_missing_or_mismatched_embeddings() {
        let mut index = VectorIndex::new();
        assert!(index.insert(chunk("no embedding", vec![])).is_err());

        index.insert(chunk("a", vec![1.0, 0.0])).unwrap();
        assert!(index.insert(chunk("b", vec![1.0, 0.0, 0.0])).is_err());
        assert_eq!(index.len(), 1);
    }
}
