//! Question batch execution against the session index

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::VectorIndex;
use crate::server::state::AppState;
use crate::types::{
    ask::AskRequest,
    response::{AnswerOutcome, AnswerRecord, AskResponse},
};

/// POST /api/session/:id/ask - Run a batch of questions
///
/// Questions run strictly sequentially against the session's index. A
/// failed question records its error and the batch continues, so the
/// response always carries one record per non-empty question.
pub async fn ask_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    let session = state.sessions().get(&id)?;
    session.ensure_unlocked()?;

    let questions = request.questions();
    let max = state.config().limits.max_questions;
    if questions.len() > max {
        return Err(Error::TooManyQuestions {
            count: questions.len(),
            max,
        });
    }

    if questions.is_empty() {
        return Ok(Json(AskResponse::new(
            Vec::new(),
            start.elapsed().as_millis() as u64,
        )));
    }

    let indexed = session.indexed_document().ok_or(Error::IndexNotReady)?;
    let top_k = request.top_k.unwrap_or(state.config().retrieval.top_k);

    tracing::info!(
        "Running {} question(s) against '{}' (top_k: {})",
        questions.len(),
        indexed.document.filename,
        top_k
    );

    let records = execute_batch(
        state.embedding_provider(),
        state.llm_provider(),
        &indexed.index,
        &questions,
        top_k,
    )
    .await;

    session.append_records(&records);

    let response = AskResponse::new(records, start.elapsed().as_millis() as u64);

    tracing::info!(
        "Batch completed in {}ms: {}/{} answered",
        response.processing_time_ms,
        response.answered,
        response.answers.len()
    );

    Ok(Json(response))
}

/// Run each question in order: embed, retrieve, prompt, generate.
///
/// Always returns exactly one record per input question.
pub(crate) async fn execute_batch(
    embedder: &Arc<dyn EmbeddingProvider>,
    llm: &Arc<dyn LlmProvider>,
    index: &VectorIndex,
    questions: &[&str],
    top_k: usize,
) -> Vec<AnswerRecord> {
    let mut records = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let ordinal = i + 1;
        tracing::debug!("Question {}: \"{}\"", ordinal, question);

        let outcome = match answer_question(embedder, llm, index, question, top_k).await {
            Ok(answer) => AnswerOutcome::Answered(answer),
            Err(e) => {
                tracing::warn!("Question {} failed: {}", ordinal, e);
                AnswerOutcome::Failed(e.to_string())
            }
        };

        records.push(AnswerRecord {
            ordinal,
            question: question.to_string(),
            outcome,
        });
    }

    records
}

/// Answer a single question against the index
async fn answer_question(
    embedder: &Arc<dyn EmbeddingProvider>,
    llm: &Arc<dyn LlmProvider>,
    index: &VectorIndex,
    question: &str,
    top_k: usize,
) -> crate::error::Result<String> {
    let query_embedding = embedder.embed(question).await?;
    let results = index.search(&query_embedding, top_k);
    let context = PromptBuilder::build_context(&results);
    llm.answer(question, &context).await
}
