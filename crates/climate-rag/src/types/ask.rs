//! Ask request types

use serde::{Deserialize, Serialize};

/// A batch of question slots to run against the indexed document.
///
/// Slots arrive as the UI submitted them: any number of entries, many of
/// them blank. [`AskRequest::questions`] trims and drops the blanks while
/// preserving slot order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// Raw question slots, in display order
    pub questions: Vec<String>,

    /// Override for the number of chunks retrieved per question
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl AskRequest {
    /// Create a request from raw slot values
    pub fn new(questions: Vec<String>) -> Self {
        Self {
            questions,
            top_k: None,
        }
    }

    /// The non-empty, whitespace-trimmed questions in slot order
    pub fn questions(&self) -> Vec<&str> {
        self.questions
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .collect()
    }
}
