use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::bootstrap::ApiState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub newsletter: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<ApiState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state);
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "kolzo-server runtime initialized".to_string(),
        },
        catalog,
        newsletter: newsletter_check(&state),
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(state: &ApiState) -> HealthCheck {
    if state.catalog.is_empty() {
        HealthCheck { status: "degraded", detail: "catalog snapshot is empty".to_string() }
    } else {
        HealthCheck {
            status: "ready",
            detail: format!("{} products loaded", state.catalog.len()),
        }
    }
}

fn newsletter_check(state: &ApiState) -> HealthCheck {
    if state.newsletter_enabled {
        HealthCheck { status: "ready", detail: "subscribe proxy configured".to_string() }
    } else {
        // Disabled is an operator choice, not a degradation.
        HealthCheck { status: "ready", detail: "integration disabled".to_string() }
    }
}
