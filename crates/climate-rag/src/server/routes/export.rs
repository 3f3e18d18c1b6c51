//! Transcript listing and export download

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::export::{self, ExportFormat};
use crate::server::state::AppState;
use crate::types::response::TranscriptResponse;

/// GET /api/session/:id/transcript - Full Q&A history
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>> {
    let session = state.sessions().get(&id)?;
    session.ensure_unlocked()?;

    Ok(Json(TranscriptResponse {
        session_id: session.id,
        records: session.transcript(),
    }))
}

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// `txt` (default) or `csv`
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "txt".to_string()
}

/// GET /api/session/:id/export - Download the transcript
///
/// Renders the answered records as flat text or CSV, writes a copy under
/// the export directory (overwriting that session's previous export), and
/// returns the rendering as an attachment.
pub async fn export_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ExportParams>,
) -> Result<Response> {
    let session = state.sessions().get(&id)?;
    session.ensure_unlocked()?;

    let format = ExportFormat::from_name(&params.format)?;

    let records = session.transcript();
    let body = export::render(&records, format)?;

    let download_name = format!("transcript-{}.{}", session.id.simple(), format.extension());

    // Disk copy, fixed name per session, overwritten on each export.
    let export_path = state.config().storage.export_dir.join(&download_name);
    tokio::fs::write(&export_path, &body).await?;

    tracing::info!(
        "Exported {} record(s) for session {} as {}",
        records.iter().filter(|r| r.outcome.is_answered()).count(),
        session.id,
        format.extension()
    );

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_name),
        ),
    ];

    Ok((headers, body).into_response())
}
