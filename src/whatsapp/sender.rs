use crate::config::WhatsAppConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("graph api returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Outbound message delivery. One delivery attempt per call, no retries;
/// callers decide how many messages an inbound event produces.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError>;
}

/// Sends text messages through the Graph API on behalf of the business
/// phone number.
pub struct CloudApiSender {
    config: WhatsAppConfig,
    client: Client,
}
impl CloudApiSender {
    pub fn new(config: WhatsAppConfig, client: Client) -> Self {
        Self { config, client }
    }
}

fn text_envelope(to: &str, body: &str) -> serde_json::Value {
    json!({
        "messaging_product": "whatsapp",
        "to": to,
        "type": "text",
        "text": { "body": body }
    })
}

#[async_trait]
impl MessageSender for CloudApiSender {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), SendError> {
        let response = self
            .client
            .post(self.config.messages_url())
            .bearer_auth(&self.config.access_token)
            .json(&text_envelope(to, body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Status { status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_envelope_shape() {
        assert_eq!(
            text_envelope("123", "hello"),
            json!({
                "messaging_product": "whatsapp",
                "to": "123",
                "type": "text",
                "text": { "body": "hello" }
            })
        );
    }
}
