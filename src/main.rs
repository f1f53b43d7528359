//! Local server entrypoint for the form guard demo application.

use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use form_guard::config::Config;
use form_guard::{AppState, create_app};

#[tokio::main]
async fn main() {
    // Load .env for local dev
    let _ = dotenvy::dotenv();

    let config = Config::from_env().expect("Failed to load configuration");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_format == "json" {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        validate_antiforgery = config.validate_antiforgery,
        validate_ajax = config.validate_ajax,
        max_body_bytes = config.max_body_bytes,
        "Form guard configured"
    );

    let state = Arc::new(AppState::new(config.clone()));
    let app = create_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting local server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
