//! Support chat relay.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stride_core::ChatSessionId;
use stride_core::chat::prepare_message;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::ClientStorage;
use crate::state::AppState;

/// Request body for `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: ChatSessionId,
}

/// Relay a visitor message to the chat webhook.
///
/// Webhook failures never surface as errors; the visitor gets the fallback
/// reply instead.
///
/// # Errors
///
/// Returns 400 for a blank message, or 500 if the session cannot be saved.
#[instrument(skip_all)]
pub async fn send(
    State(state): State<AppState>,
    mut storage: ClientStorage,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let message = prepare_message(&request.message)
        .ok_or_else(|| AppError::BadRequest("message must not be empty".to_string()))?;

    let session_id = storage.chat_session_id();
    storage.commit().await?;

    add_breadcrumb(
        "chat",
        "Chat message sent",
        &[("session_id", session_id.to_string())],
    );
    let reply = state.chat().reply(&message, &session_id).await;

    Ok(Json(ChatResponse { reply, session_id }))
}
