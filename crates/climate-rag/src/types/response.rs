//! Response payload types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Document;

/// Outcome of a single question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// The model returned an answer
    Answered(String),
    /// The query failed; the message is what the upstream reported
    Failed(String),
}

impl AnswerOutcome {
    /// Whether this record carries an answer
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered(_))
    }
}

/// One question paired with its outcome, in slot order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// 1-based position among the non-empty questions of the batch
    pub ordinal: usize,
    /// The question as asked (trimmed)
    pub question: String,
    /// What happened
    pub outcome: AnswerOutcome,
}

/// Response to a session-creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Session ID, passed in the path of every subsequent call
    pub session_id: Uuid,
    /// Whether the session must be unlocked before use
    pub locked: bool,
}

/// Response to an upload request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// The indexed document
    pub document: DocumentSummary,
    /// Number of chunks created
    pub chunks_created: u32,
    /// Wall-clock processing time
    pub processing_time_ms: u64,
}

/// Document summary for responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub filename: String,
    pub total_pages: Option<u32>,
    pub total_chunks: u32,
    pub file_size: u64,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            total_pages: doc.total_pages,
            total_chunks: doc.total_chunks,
            file_size: doc.file_size,
        }
    }
}

/// Response to an ask request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// One record per non-empty question, in slot order
    pub answers: Vec<AnswerRecord>,
    /// How many of them were answered (vs failed)
    pub answered: usize,
    /// Wall-clock processing time for the whole batch
    pub processing_time_ms: u64,
}

impl AskResponse {
    /// Build a response from the batch records
    pub fn new(answers: Vec<AnswerRecord>, processing_time_ms: u64) -> Self {
        let answered = answers.iter().filter(|r| r.outcome.is_answered()).count();
        Self {
            answers,
            answered,
            processing_time_ms,
        }
    }
}

/// Transcript listing for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub session_id: Uuid,
    pub records: Vec<AnswerRecord>,
}
