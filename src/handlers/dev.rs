use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{DestinationInfo, DirectionInfo, OriginInfo};
use crate::services::recognizer::{extract_destination, extract_direction, extract_origin};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RecognizeRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct RecognizeResponse {
    pub top_intent: Option<String>,
    pub origin: OriginInfo,
    pub destination: DestinationInfo,
    pub direction: DirectionInfo,
}

/// Runs the recognizer on a single utterance without touching any dialog.
pub async fn recognize(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecognizeRequest>,
) -> Result<Json<RecognizeResponse>, AppError> {
    if !state.recognizer.is_configured() {
        return Err(AppError::Unavailable(
            "entity recognizer is not configured".to_string(),
        ));
    }

    let result = state
        .recognizer
        .recognize(payload.text.trim())
        .await
        .map_err(|e| AppError::Recognizer(format!("{e:#}")))?;

    Ok(Json(RecognizeResponse {
        origin: extract_origin(&result),
        destination: extract_destination(&result),
        direction: extract_direction(&result),
        top_intent: result.top_intent,
    }))
}
