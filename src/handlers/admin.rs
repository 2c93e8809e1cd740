use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BookingRecord, DialogState};
use crate::state::AppState;

pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DialogState>, AppError> {
    let conv = {
        let db = state.db()?;
        queries::get_conversation(&db, &id)?
    };

    conv.and_then(|c| c.dialog)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no active dialog for conversation {id}")))
}

#[derive(Deserialize)]
pub struct BookingsQuery {
    pub limit: Option<i64>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let db = state.db()?;
    let bookings = queries::list_bookings(&db, limit)?;
    Ok(Json(bookings))
}
