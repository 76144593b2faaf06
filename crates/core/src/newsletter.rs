//! Newsletter subscription contract.
//!
//! The storefront never talks to the email/CRM provider directly from the
//! dialogue engine: the engine emits a `Subscribe` effect, the widget session
//! calls whatever `NewsletterService` implementation it was given, and the
//! resolution is fed back through the engine as an event. Email format
//! validation happens locally, before any external call is issued.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attribution value for subscriptions collected through the chat widget.
pub const SOURCE_CHAT_WIDGET: &str = "chat_widget";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub source: String,
    pub consent: bool,
}

impl SubscribeRequest {
    pub fn from_widget(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            last_name: None,
            source: SOURCE_CHAT_WIDGET.to_string(),
            consent: true,
        }
    }
}

/// Successful non-error outcomes. An already-registered address is a distinct
/// outcome, not a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeOutcome {
    NewSubscription,
    AlreadyRegistered,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NewsletterError {
    #[error("newsletter integration is disabled")]
    Disabled,
    #[error("subscription provider rejected the request (status {status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("subscription provider unreachable: {0}")]
    Transport(String),
}

/// The collapsed result the dialogue engine branches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeResolution {
    Subscribed,
    AlreadyRegistered,
    Failed,
}

impl SubscribeResolution {
    pub fn from_result(result: &Result<SubscribeOutcome, NewsletterError>) -> Self {
        match result {
            Ok(SubscribeOutcome::NewSubscription) => Self::Subscribed,
            Ok(SubscribeOutcome::AlreadyRegistered) => Self::AlreadyRegistered,
            Err(_) => Self::Failed,
        }
    }
}

#[async_trait]
pub trait NewsletterService: Send + Sync {
    async fn subscribe(
        &self,
        request: &SubscribeRequest,
    ) -> Result<SubscribeOutcome, NewsletterError>;
}

/// Accepts every address as a new subscription. Used by the CLI chat command
/// and as the server fallback when the integration is disabled.
#[derive(Clone, Debug, Default)]
pub struct NoopNewsletterService;

#[async_trait]
impl NewsletterService for NoopNewsletterService {
    async fn subscribe(
        &self,
        _request: &SubscribeRequest,
    ) -> Result<SubscribeOutcome, NewsletterError> {
        Ok(SubscribeOutcome::NewSubscription)
    }
}

/// Format-level email check. Deliberately loose: the upstream provider is the
/// authority on deliverability, this only rejects input that cannot be an
/// address at all.
pub fn is_valid_email(raw: &str) -> bool {
    let candidate = raw.trim();
    if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2
}

#[cfg(test)]
mod tests {
    use super::{
        is_valid_email, NewsletterError, SubscribeOutcome, SubscribeRequest, SubscribeResolution,
    };

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("  claire.dupont@maison.paris "));
        assert!(is_valid_email("first+tag@sub.example.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@domain.c"));
        assert!(!is_valid_email("two words@example.com"));
        assert!(!is_valid_email("user@@example.com"));
    }

    #[test]
    fn widget_requests_carry_source_and_consent() {
        let request = SubscribeRequest::from_widget("a@b.com");
        assert_eq!(request.source, "chat_widget");
        assert!(request.consent);
        assert!(request.first_name.is_none());
    }

    #[test]
    fn resolution_collapses_results() {
        assert_eq!(
            SubscribeResolution::from_result(&Ok(SubscribeOutcome::NewSubscription)),
            SubscribeResolution::Subscribed
        );
        assert_eq!(
            SubscribeResolution::from_result(&Ok(SubscribeOutcome::AlreadyRegistered)),
            SubscribeResolution::AlreadyRegistered
        );
        assert_eq!(
            SubscribeResolution::from_result(&Err(NewsletterError::Transport(
                "connection refused".to_string()
            ))),
            SubscribeResolution::Failed
        );
    }
}
