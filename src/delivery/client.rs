//! @ai:module:intent Email delivery contract and the transactional-email HTTP client
//! @ai:module:layer infrastructure
//! @ai:module:public_api Mailer, EmailMessage, DeliveryReceipt, DeliveryError, HttpMailer
//! @ai:module:stateless true

use crate::config::DeliveryConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// @ai:intent Failures surfaced by the delivery provider; always terminal for the request
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Failed to reach delivery provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Delivery provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// @ai:intent One outgoing HTML email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// @ai:intent Provider acknowledgement for an accepted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub id: String,
    pub accepted_at: DateTime<Utc>,
}

/// @ai:intent Opaque message-delivery collaborator
pub trait Mailer: Send + Sync {
    /// @ai:intent Deliver one message; no retry, no queuing
    /// @ai:effects network
    fn send(
        &self,
        message: &EmailMessage,
    ) -> impl Future<Output = Result<DeliveryReceipt, DeliveryError>> + Send;
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: String,
}

/// @ai:intent Bearer-authenticated `POST /emails` client
pub struct HttpMailer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    sender: String,
}

impl HttpMailer {
    /// @ai:intent Create a mailer sending as `sender`
    /// @ai:effects pure
    pub fn new(config: &DeliveryConfig, api_key: String, sender: String) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            sender,
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        if message.to.trim().is_empty() {
            return Err(DeliveryError::Rejected("recipient is empty".to_string()));
        }

        let request = SendRequest {
            from: &self.sender,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SendResponse = response.json().await?;
        if parsed.id.is_empty() {
            return Err(DeliveryError::Rejected(
                "provider returned no message id".to_string(),
            ));
        }

        tracing::debug!(
            message_id = %parsed.id,
            html_len = message.html.len(),
            "message accepted"
        );

        Ok(DeliveryReceipt {
            id: parsed.id,
            accepted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn mailer_for(url: &str) -> HttpMailer {
        let config = DeliveryConfig {
            base_url: url.to_string(),
            ..Default::default()
        };
        HttpMailer::new(&config, "re_test".to_string(), "reports@example.com".to_string()).unwrap()
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to: "founder@example.com".to_string(),
            subject: "Your Idea Evaluation Report".to_string(),
            html: "<p>report</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_returns_receipt() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/emails")
            .match_header("authorization", "Bearer re_test")
            .match_body(Matcher::PartialJsonString(
                r#"{"from":"reports@example.com","to":["founder@example.com"],"subject":"Your Idea Evaluation Report"}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"msg_123"}"#)
            .create_async()
            .await;

        let receipt = mailer_for(&server.url()).send(&message()).await.unwrap();
        assert_eq!(receipt.id, "msg_123");
    }

    #[tokio::test]
    async fn test_provider_failure_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/emails")
            .with_status(422)
            .with_body("invalid from address")
            .create_async()
            .await;

        let err = mailer_for(&server.url()).send(&message()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Provider { status: 422, .. }));
    }

    #[tokio::test]
    async fn test_empty_recipient_rejected_without_request() {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", "/emails").expect(0).create_async().await;

        let mut msg = message();
        msg.to = " ".to_string();
        let err = mailer_for(&server.url()).send(&msg).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected(_)));
        mock.assert_async().await;
    }
}
