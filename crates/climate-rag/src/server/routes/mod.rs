//! API routes for the Q&A server

pub mod ask;
pub mod export;
pub mod session;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Session lifecycle
        .route("/session", post(session::create_session))
        .route("/session/:id/unlock", post(session::unlock_session))
        // Upload - with larger body limit for the PDF
        .route(
            "/session/:id/upload",
            post(upload::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Questions
        .route("/session/:id/ask", post(ask::ask_questions))
        // Transcript and export
        .route("/session/:id/transcript", get(export::get_transcript))
        .route("/session/:id/export", get(export::export_transcript))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "climate-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Climate transition plan Q&A over uploaded PDFs",
        "endpoints": {
            "POST /api/session": "Create a session",
            "POST /api/session/:id/unlock": "Unlock a gated session",
            "POST /api/session/:id/upload": "Upload and index a PDF",
            "POST /api/session/:id/ask": "Ask up to 40 questions against the indexed PDF",
            "GET /api/session/:id/transcript": "Full Q&A history",
            "GET /api/session/:id/export": "Download the transcript (format=txt|csv)"
        }
    }))
}
