use crate::api::events::WebhookEvent;
use crate::error::NotifyError;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client as HttpClient;
use serde::Serialize;

pub const USER_AGENT_VALUE: &str = "AI-Receptionist-Dashboard/1.0";

/// Outcome of one webhook send. Converts to `bool` for call sites that only
/// care whether it went out.
#[derive(Debug)]
pub enum Delivery {
    Delivered { status: u16 },
    /// No webhook URL configured; nothing was sent.
    Skipped,
    Failed(NotifyError),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered { .. })
    }

    pub fn error(&self) -> Option<&NotifyError> {
        match self {
            Delivery::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Delivery> for bool {
    fn from(delivery: Delivery) -> bool {
        delivery.is_delivered()
    }
}

/// Posts envelopes to a single webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: HttpClient,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_http(HttpClient::new(), url)
    }

    pub fn with_http(http: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// Sends one envelope. Failures are logged and handed back, never raised.
    pub async fn post<T: Serialize>(&self, event: &WebhookEvent<T>) -> Delivery {
        if !self.is_configured() {
            log::warn!("Webhook URL not configured, skipping webhook: {}", event.event);
            return Delivery::Skipped;
        }

        match self.try_post(event).await {
            Ok(status) => {
                log::info!("Webhook sent successfully: {}", event.event);
                Delivery::Delivered { status }
            }
            Err(e) => {
                log::error!("Webhook error ({}): {e}", event.event);
                Delivery::Failed(e)
            }
        }
    }

    async fn try_post<T: Serialize>(&self, event: &WebhookEvent<T>) -> Result<u16, NotifyError> {
        let resp = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .json(event)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        Ok(status.as_u16())
    }
}
