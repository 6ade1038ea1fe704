//! HTTP proxy in front of the registrar API.
//!
//! The registrar credential stays on the server; the storefront only ever
//! talks to these three routes:
//! - `POST /api/check-availability` relays a bulk availability lookup
//! - `GET /api/tlds` relays TLD pricing
//! - `POST /api/domain/register` builds a purchase payload and relays it
//!
//! Nothing is retried. A failed upstream call ends that request and is logged
//! here with the registrar's own error text.

pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::registrar::RegistrarClient;
use routes::{check_availability_handler, register_handler, tlds_handler};

pub struct AppState {
    pub registrar: RegistrarClient,
}

impl AppState {
    pub fn new(registrar: RegistrarClient) -> Arc<Self> {
        Arc::new(Self { registrar })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/check-availability", post(check_availability_handler))
        .route("/api/tlds", get(tlds_handler))
        .route("/api/domain/register", post(register_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: ServerConfig) -> std::io::Result<()> {
    info!("Registrar URL: {}", config.registrar_url);
    info!("Auth header (partial): {}", redact(&config.auth_header));

    let state = AppState::new(RegistrarClient::new(
        config.registrar_url.clone(),
        config.auth_header.clone(),
    ));
    let app = router(state);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Proxy server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Keep only enough of a credential to recognise it in logs
fn redact(secret: &str) -> String {
    const VISIBLE: usize = 10;
    if secret.chars().count() <= VISIBLE {
        return secret.to_string();
    }
    let head: String = secret.chars().take(VISIBLE).collect();
    format!("{head}...")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
