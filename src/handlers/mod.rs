pub mod admin;
pub mod dev;
pub mod health;
pub mod messages;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/messages", post(messages::post_message))
        .route(
            "/api/conversations/:id",
            get(admin::get_conversation),
        )
        .route("/api/bookings", get(admin::get_bookings))
        .route("/api/recognize", post(dev::recognize))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
