//! Outbound mail backends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use account_core::config::notifier::NotifierConfig;
use account_core::error::{AppError, ErrorKind};
use account_core::result::AppResult;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Delivery priority hint passed through to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailPriority {
    /// Deliver ahead of normal traffic.
    High,
    /// Default priority.
    #[default]
    Normal,
    /// Bulk traffic.
    Low,
}

/// A single outbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub body: String,
    /// Delivery priority.
    pub priority: MailPriority,
}

/// A mail delivery backend.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Deliver one message.
    async fn send(&self, message: &MailMessage) -> AppResult<()>;
}

/// Build the notifier named by `notifier.provider`.
pub fn from_config(config: &NotifierConfig) -> AppResult<Arc<dyn Notifier>> {
    match config.provider.as_str() {
        "log" => {
            info!("Initializing log notifier");
            Ok(Arc::new(LogNotifier))
        }
        "http" => {
            info!(relay_url = %config.relay_url, "Initializing HTTP relay notifier");
            Ok(Arc::new(HttpRelayNotifier::new(config)?))
        }
        other => Err(AppError::configuration(format!(
            "Unknown notifier provider: '{other}'. Supported: log, http"
        ))),
    }
}

/// Writes a line per message to the log. The body is never logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        info!(
            to = ?message.to,
            subject = %message.subject,
            priority = ?message.priority,
            "Mail message (log notifier)"
        );
        Ok(())
    }
}

/// Relay payload posted to the mail gateway.
#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    message_id: Uuid,
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    body: &'a str,
    content_type: &'static str,
    priority: MailPriority,
}

/// Posts each message as JSON to an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct HttpRelayNotifier {
    client: Client,
    relay_url: String,
    from_address: String,
}

impl HttpRelayNotifier {
    /// Create a relay notifier. Requires `notifier.relay_url`.
    pub fn new(config: &NotifierConfig) -> AppResult<Self> {
        if config.relay_url.trim().is_empty() {
            return Err(AppError::configuration(
                "notifier.relay_url is required for the http provider",
            ));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.send_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            relay_url: config.relay_url.clone(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Notifier for HttpRelayNotifier {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        let payload = RelayRequest {
            message_id: Uuid::new_v4(),
            from: &self.from_address,
            to: &message.to,
            subject: &message.subject,
            body: &message.body,
            content_type: "html",
            priority: message.priority,
        };

        let response = self
            .client
            .post(&self.relay_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Mail relay unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Mail relay responded with {status}"
            )));
        }

        debug!(message_id = %payload.message_id, "Mail relayed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_rejected() {
        let config = NotifierConfig {
            provider: "smtp".to_string(),
            ..NotifierConfig::default()
        };
        let err = from_config(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_http_requires_relay_url() {
        let config = NotifierConfig {
            provider: "http".to_string(),
            ..NotifierConfig::default()
        };
        assert!(from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_log_notifier_accepts_message() {
        let notifier = from_config(&NotifierConfig::default()).unwrap();
        assert_eq!(notifier.name(), "log");

        let message = MailMessage {
            to: vec!["u@mail.ru".to_string()],
            subject: "Hello".to_string(),
            body: "<p>secret</p>".to_string(),
            priority: MailPriority::High,
        };
        assert!(notifier.send(&message).await.is_ok());
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MailPriority::High).unwrap(),
            "\"high\""
        );
    }
}
