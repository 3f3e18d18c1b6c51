//! Transcript export: flat text and CSV renderings
//!
//! Only answered records are exported; failed questions stay visible in the
//! transcript endpoint but never reach an export file.

use crate::error::{Error, Result};
use crate::types::response::{AnswerOutcome, AnswerRecord};

/// Export formats offered for a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Flat question/answer text file
    Text,
    /// CSV with `question,answer` columns
    Csv,
}

impl ExportFormat {
    /// Parse a format name from a query parameter
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            other => Err(Error::Config(format!("Unknown export format: {}", other))),
        }
    }

    /// File extension for the download name
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
        }
    }

    /// Content type for the download response
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

/// Render the answered records of a transcript
pub fn render(records: &[AnswerRecord], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(to_text(records)),
        ExportFormat::Csv => to_csv(records),
    }
}

/// Flat text rendering, one block per answered question
pub fn to_text(records: &[AnswerRecord]) -> String {
    let mut out = String::new();

    for record in records {
        if let AnswerOutcome::Answered(answer) = &record.outcome {
            out.push_str(&format!("Q{}: {}\n", record.ordinal, record.question));
            out.push_str(&format!("Answer: {}\n", answer));
            out.push_str(&"-".repeat(50));
            out.push('\n');
        }
    }

    out
}

/// CSV rendering with RFC-4180 quoting
pub fn to_csv(records: &[AnswerRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["question", "answer"])
        .map_err(|e| Error::Internal(format!("CSV write failed: {}", e)))?;

    for record in records {
        if let AnswerOutcome::Answered(answer) = &record.outcome {
            writer
                .write_record([record.question.as_str(), answer.as_str()])
                .map_err(|e| Error::Internal(format!("CSV write failed: {}", e)))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("CSV flush failed: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| Error::Internal(format!("CSV encoding failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered(ordinal: usize, question: &str, answer: &str) -> AnswerRecord {
        AnswerRecord {
            ordinal,
            question: question.to_string(),
            outcome: AnswerOutcome::Answered(answer.to_string()),
        }
    }

    fn failed(ordinal: usize, question: &str) -> AnswerRecord {
        AnswerRecord {
            ordinal,
            question: question.to_string(),
            outcome: AnswerOutcome::Failed("upstream unavailable".to_string()),
        }
    }

    #[test]
    fn text_export_has_one_block_per_answered_record() {
        let records = vec![
            answered(1, "What is the target?", "Net zero by 2050."),
            failed(2, "What about scope 3?"),
            answered(3, "Which baseline year?", "2019."),
        ];

        let text = to_text(&records);
        assert_eq!(text.matches("Q").count(), 2);
        assert!(text.contains("Q1: What is the target?"));
        assert!(text.contains("Answer: Net zero by 2050."));
        assert!(text.contains("Q3: Which baseline year?"));
        assert!(!text.contains("scope 3"));
    }

    #[test]
    fn csv_row_count_equals_answered_count() {
        let records = vec![
            answered(1, "a", "1"),
            failed(2, "b"),
            answered(3, "c", "3"),
            answered(4, "d", "4"),
        ];

        let csv_text = to_csv(&records).unwrap();
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let rows: Vec<_> = reader.records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn csv_survives_delimiters_quotes_and_newlines() {
        let tricky_question = "Does the plan cover scope 1, 2; and 3?";
        let tricky_answer = "Yes: \"all three\",\nper page 4";
        let records = vec![answered(1, tricky_question, tricky_answer)];

        let csv_text = to_csv(&records).unwrap();
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], tricky_question);
        assert_eq!(&row[1], tricky_answer);
    }

    #[test]
    fn empty_transcript_exports_cleanly() {
        assert!(to_text(&[]).is_empty());
        let csv_text = to_csv(&[]).unwrap();
        assert_eq!(csv_text.trim(), "question,answer");
    }

    #[test]
    fn format_parsing_and_metadata() {
        assert_eq!(ExportFormat::from_name("csv").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_name("TXT").unwrap(), ExportFormat::Text);
        assert!(ExportFormat::from_name("xlsx").is_err());
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert!(ExportFormat::Text.content_type().starts_with("text/plain"));
    }
}
