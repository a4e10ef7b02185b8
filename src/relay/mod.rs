//! Same-origin relay around the scrubbing and dispatch services.
//!
//! Browsers cannot call the third-party services cross-origin, so the relay
//! forwards the two primary-path queries and runs the backup sequence
//! server-side. It listens on two ports (main + a compatibility port) so
//! existing clients keep working.

mod handlers;

use crate::api::create_http_client;
use crate::config::Settings;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared relay state: settings plus one upstream HTTP client.
#[derive(Clone)]
pub struct RelayState {
    settings: Arc<Settings>,
    client: HttpClient,
}

impl RelayState {
    /// Creates relay state with a timeout-configured upstream client.
    #[must_use]
    pub fn new(settings: Arc<Settings>) -> Self {
        let client = create_http_client(Duration::from_secs(settings.http_timeout_secs));
        Self { settings, client }
    }
}

/// Builds the relay router with its CORS layer applied.
pub fn router(state: RelayState) -> Router {
    let cors = cors_layer(&state.settings);

    Router::new()
        .route("/api/scrubbing-logs", get(handlers::scrubbing_logs))
        .route("/api/send-sms", get(handlers::send_sms))
        .route("/process-message", post(handlers::process_message))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    if settings.is_development() {
        // Development keeps CORS wide open so any origin may call in.
        return CorsLayer::very_permissive();
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins()
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    if origins.is_empty() {
        warn!("production mode with no allowed origins configured");
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}

/// Binds both listening ports and serves until one of them fails.
///
/// # Errors
///
/// Returns an error if a port cannot be bound or a server loop exits.
pub async fn serve(settings: Arc<Settings>) -> anyhow::Result<()> {
    let app = router(RelayState::new(settings.clone()));

    let main = TcpListener::bind(("0.0.0.0", settings.relay_port)).await?;
    info!(port = settings.relay_port, "relay listening");

    let compat = TcpListener::bind(("0.0.0.0", settings.relay_backup_port)).await?;
    info!(port = settings.relay_backup_port, "compatibility relay listening");

    let compat_app = app.clone();
    tokio::try_join!(
        async move { axum::serve(main, app).await },
        async move { axum::serve(compat, compat_app).await },
    )?;

    Ok(())
}
