//! Prompt templates for document-grounded answers

use crate::retrieval::SearchResult;

/// Prompt builder for retrieval-grounded questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from retrieved chunks
    pub fn build_context(results: &[SearchResult]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n\nContent:\n{}\n\n---\n\n",
                i + 1,
                result.chunk.source.format_reference(),
                result.chunk.content
            ));
        }

        context
    }

    /// Build the full answer prompt with strict grounding
    pub fn build_answer_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are a document-grounded assistant analysing a climate transition plan.

RULES:
1. ONLY use information that is explicitly stated in the CONTEXT below
2. If the answer is not in the context, respond with "This information is not available in the provided document."
3. NEVER use external knowledge, general knowledge, or training data
4. Stay close to the source text; do not paraphrase in ways that change meaning

CONTEXT FROM THE DOCUMENT:
{context}

QUESTION: {question}

Provide a grounded answer using ONLY the document content above:"#,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkSource};
    use uuid::Uuid;

    fn result(content: &str, page: Option<u32>) -> SearchResult {
        let source = ChunkSource {
            filename: "plan.pdf".to_string(),
            page_number: page,
            page_count: Some(12),
        };
        SearchResult {
            chunk: Chunk::new(Uuid::new_v4(), content.to_string(), source, 0, content.len(), 0),
            similarity: 0.9,
        }
    }

    #[test]
    fn context_numbers_each_source_block() {
        let results = vec![
            result("Net zero by 2050.", Some(3)),
            result("Interim target of -30% by 2030.", None),
        ];
        let context = PromptBuilder::build_context(&results);

        assert!(context.contains("[1] plan.pdf, page 3"));
        assert!(context.contains("[2] plan.pdf"));
        assert!(context.contains("Net zero by 2050."));
        assert!(context.contains("Interim target of -30% by 2030."));
    }

    #[test]
    fn answer_prompt_embeds_question_and_context() {
        let prompt = PromptBuilder::build_answer_prompt("What is the 2030 target?", "[1] ...");
        assert!(prompt.contains("QUESTION: What is the 2030 target?"));
        assert!(prompt.contains("[1] ..."));
        assert!(prompt.contains("ONLY"));
    }

    #[test]
    fn empty_retrieval_yields_empty_context() {
        assert!(PromptBuilder::build_context(&[]).is_empty());
    }
}
