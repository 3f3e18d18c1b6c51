//! Session creation and the access gate

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::response::SessionResponse;

/// POST /api/session - Create a new session
pub async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.sessions().create();

    tracing::info!(
        "Created session {} (locked: {})",
        session.id,
        !session.is_unlocked()
    );

    Json(SessionResponse {
        session_id: session.id,
        locked: !session.is_unlocked(),
    })
}

/// Unlock request body
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

/// POST /api/session/:id/unlock - Pass the access gate
pub async fn unlock_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UnlockRequest>,
) -> Result<Json<SessionResponse>> {
    state.sessions().unlock(&id, &request.password)?;
    let session = state.sessions().get(&id)?;

    tracing::info!("Session {} unlocked", id);

    Ok(Json(SessionResponse {
        session_id: session.id,
        locked: !session.is_unlocked(),
    }))
}
