use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info};

use super::{error::AppError, AppState};
use crate::registrar::{PurchasePayload, RegisterRequest, RegistrarError, Upstream};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailability {
    domain_names: Vec<String>,
}

/// Run a blocking registrar call off the async workers
async fn blocking<F>(call: F) -> Result<Result<Upstream, RegistrarError>, AppError>
where
    F: FnOnce() -> Result<Upstream, RegistrarError> + Send + 'static,
{
    spawn_blocking(call)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Upstream bytes, untouched
fn relay(upstream: Upstream) -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/json")],
        upstream.body,
    )
        .into_response()
}

pub async fn check_availability_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckAvailability>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload.map_err(|e| {
        debug!("Rejected availability payload: {e}");
        AppError::MalformedPayload
    })?;

    let registrar = state.registrar.clone();
    let result = blocking(move || registrar.check_availability(&payload.domain_names)).await?;

    match result {
        Ok(upstream) => {
            debug!("API response: {}", String::from_utf8_lossy(&upstream.body));
            Ok(relay(upstream))
        }
        Err(e) => {
            error!("Error checking domain availability: {}", e.detail());
            Err(AppError::Upstream("Failed to fetch from registrar"))
        }
    }
}

pub async fn tlds_handler(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let registrar = state.registrar.clone();
    match blocking(move || registrar.tlds()).await? {
        Ok(upstream) => Ok(relay(upstream)),
        Err(e) => {
            error!("Error fetching TLDs: {}", e.detail());
            Err(AppError::Upstream("Failed to fetch TLDs"))
        }
    }
}

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| {
        debug!("Rejected registration payload: {e}");
        AppError::MalformedPayload
    })?;

    let domain = request.domain_name.clone();
    let purchase = PurchasePayload::from(request);
    let registrar = state.registrar.clone();

    match blocking(move || registrar.register(&purchase)).await? {
        Ok(upstream) => {
            info!("Registered {domain}");
            Ok(relay(upstream))
        }
        Err(e) => {
            error!("Error registering domain: {}", e.detail());
            Err(match e {
                RegistrarError::Status { body, .. } if !body.is_empty() => AppError::Rejected(body),
                other => AppError::RegistrationFailed(other.to_string()),
            })
        }
    }
}
