//! climate-rag: Q&A over climate transition plan PDFs
//!
//! This crate serves a single workflow: upload a PDF, index it in-process
//! (chunking + hosted embeddings + cosine retrieval), then answer a batch of
//! questions against it through the OpenAI chat API, grounded on the
//! retrieved passages. Each uploaded document and its index belong to one
//! session; transcripts can be exported as text or CSV.

pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    ask::AskRequest,
    document::{Chunk, ChunkSource, Document},
    response::{AnswerOutcome, AnswerRecord, AskResponse, UploadResponse},
};
