//! Provider abstractions for embeddings and answer generation
//!
//! Trait seams keep the upstream API swappable (and stubbable in tests);
//! the one shipped implementation talks to the hosted OpenAI API.

pub mod embedding;
pub mod llm;
pub mod openai;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use openai::OpenAiClient;
