//! Core data types

pub mod ask;
pub mod document;
pub mod response;

pub use ask::AskRequest;
pub use document::{Chunk, ChunkSource, Document};
pub use response::{AnswerOutcome, AnswerRecord, AskResponse, UploadResponse};
