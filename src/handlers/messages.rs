use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::services::conversation::{self, TurnOutcome};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MessageRequest {
    pub conversation_id: String,
    /// Defaults to the conversation id.
    #[serde(default)]
    pub user_id: Option<String>,
    pub text: String,
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MessageRequest>,
) -> Result<Json<TurnOutcome>, AppError> {
    let conversation_id = payload.conversation_id.trim();
    if conversation_id.is_empty() {
        return Err(AppError::BadRequest("conversation_id is required".to_string()));
    }
    let user_id = payload
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(conversation_id);
    let text = payload.text.trim();

    tracing::info!(conversation = %conversation_id, user = %user_id, text = %text, "incoming message");

    let outcome = conversation::process_message(&state, conversation_id, user_id, text).await?;

    // Cleanup expired conversations opportunistically
    {
        let db = state.db()?;
        if let Err(e) = queries::expire_old_conversations(&db) {
            tracing::warn!(error = %e, "failed to expire old conversations");
        }
    }

    Ok(Json(outcome))
}
