use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use flightbot::config::AppConfig;
use flightbot::db;
use flightbot::handlers;
use flightbot::services::recognizer::EntityRecognizer;
use flightbot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let recognizer = EntityRecognizer::from_config(&config);
    if recognizer.is_configured() {
        tracing::info!(host = %config.luis_api_host_name, "using LUIS entity recognizer");
    } else {
        tracing::warn!("LUIS is not configured, bookings start without entity pre-fill");
    }

    let state = Arc::new(AppState::new(conn, config.clone(), recognizer));
    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
