//! Newsletter subscribe proxy.
//!
//! The browser never holds the provider API key: the storefront posts to this
//! route, the email format is validated locally, and only well-formed
//! requests are forwarded to the third-party service with the key attached.

use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use kolzo_core::config::NewsletterConfig;
use kolzo_core::newsletter::{
    is_valid_email, NewsletterError, NewsletterService, SubscribeOutcome, SubscribeRequest,
};

use crate::bootstrap::ApiState;
use crate::catalog_api::ApiEnvelope;

const API_KEY_HEADER: &str = "x-api-key";
const DEFAULT_SOURCE: &str = "storefront";

/// Outbound client for the third-party email/CRM service.
#[derive(Clone)]
pub struct HttpNewsletterService {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpNewsletterService {
    pub fn from_config(config: &NewsletterConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        // Validation guarantees both fields when the integration is enabled.
        let base_url =
            config.base_url.as_deref().unwrap_or_default().trim_end_matches('/').to_string();
        let api_key =
            config.api_key.clone().unwrap_or_else(|| SecretString::from(String::new()));

        Ok(Self { client, base_url, api_key })
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    already_registered: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl NewsletterService for HttpNewsletterService {
    async fn subscribe(
        &self,
        request: &SubscribeRequest,
    ) -> Result<SubscribeOutcome, NewsletterError> {
        let url = format!("{}/subscribers", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|error| NewsletterError::Transport(error.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::CONFLICT {
            return Ok(SubscribeOutcome::AlreadyRegistered);
        }

        let body: UpstreamResponse =
            response.json().await.unwrap_or(UpstreamResponse {
                success: None,
                already_registered: None,
                message: None,
            });

        if status.is_success() {
            if body.already_registered.unwrap_or(false) {
                return Ok(SubscribeOutcome::AlreadyRegistered);
            }
            if body.success.unwrap_or(true) {
                return Ok(SubscribeOutcome::NewSubscription);
            }
        }

        Err(NewsletterError::Upstream {
            status: status.as_u16(),
            message: body.message.unwrap_or_else(|| "subscription rejected".to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SubscribeBody {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub consent: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SubscribePayload {
    pub status: &'static str,
    pub message: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new().route("/api/v1/newsletter/subscribe", post(subscribe)).with_state(state)
}

pub async fn subscribe(
    State(state): State<ApiState>,
    Json(body): Json<SubscribeBody>,
) -> (StatusCode, Json<ApiEnvelope<SubscribePayload>>) {
    if !is_valid_email(&body.email) {
        // Caught before any upstream call is issued.
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiEnvelope::fail("a valid email address is required")),
        );
    }

    if !state.newsletter_enabled {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiEnvelope::fail("newsletter integration is disabled")),
        );
    }

    let request = SubscribeRequest {
        email: body.email.trim().to_string(),
        first_name: body.first_name,
        last_name: body.last_name,
        source: body.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        consent: body.consent.unwrap_or(true),
    };

    match state.newsletter.subscribe(&request).await {
        Ok(SubscribeOutcome::NewSubscription) => {
            info!(
                event_name = "api.newsletter.subscribed",
                source = %request.source,
                "new newsletter subscription"
            );
            (
                StatusCode::OK,
                Json(ApiEnvelope::ok(SubscribePayload {
                    status: "subscribed",
                    message: "Welcome to the KOLZO circle.".to_string(),
                })),
            )
        }
        Ok(SubscribeOutcome::AlreadyRegistered) => (
            StatusCode::OK,
            Json(ApiEnvelope::ok(SubscribePayload {
                status: "already_registered",
                message: "This address is already part of the KOLZO circle.".to_string(),
            })),
        ),
        Err(error) => {
            warn!(
                event_name = "api.newsletter.subscribe_failed",
                error = %error,
                "newsletter subscription failed"
            );
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiEnvelope::fail("the subscription service is temporarily unavailable")),
            )
        }
    }
}
