//! Support chat webhook client.
//!
//! Each visitor message is posted as `{message, sessionId}` to the
//! configured webhook, which answers `{output}`. There is no retry; callers
//! that want a reply no matter what use [`ChatClient::reply`], which swaps
//! any failure for [`FALLBACK_REPLY`].

use stride_core::ChatSessionId;
use stride_core::chat::{FALLBACK_REPLY, WebhookRequest, WebhookResponse};
use thiserror::Error;
use tracing::instrument;

use crate::config::ChatConfig;

/// Errors that can occur when calling the chat webhook.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No webhook URL is configured.
    #[error("chat webhook not configured")]
    NotConfigured,

    /// HTTP request failed (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Webhook answered with a non-success status.
    #[error("webhook returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Webhook answered with an empty `output`.
    #[error("webhook returned an empty reply")]
    EmptyReply,
}

/// Client for the support chat webhook.
#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl ChatClient {
    /// Create a new chat client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            webhook_url: config.webhook_url().map(str::to_owned),
        })
    }

    /// Whether a webhook is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Post a message and return the webhook's reply.
    ///
    /// # Errors
    ///
    /// Returns error if the webhook is unset, unreachable, answers a
    /// non-2xx status, or answers without a usable `output`.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn send(
        &self,
        message: &str,
        session_id: &ChatSessionId,
    ) -> Result<String, ChatError> {
        let url = self.webhook_url.as_deref().ok_or(ChatError::NotConfigured)?;

        let body = WebhookRequest {
            message: message.to_owned(),
            session_id: session_id.clone(),
        };

        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply: WebhookResponse = response.json().await?;
        let output = reply.output.trim();
        if output.is_empty() {
            return Err(ChatError::EmptyReply);
        }

        Ok(output.to_owned())
    }

    /// Post a message, falling back to a static apology on any failure.
    pub async fn reply(&self, message: &str, session_id: &ChatSessionId) -> String {
        match self.send(message, session_id).await {
            Ok(output) => output,
            Err(ChatError::NotConfigured) => {
                tracing::warn!("Chat message received but no webhook is configured");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat webhook call failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::{Json, Router, http::StatusCode, routing::post};
    use secrecy::SecretString;
    use stride_core::chat::WebhookRequest;

    use super::*;

    /// Serve `router` on an ephemeral port and return its URL.
    async fn spawn_webhook(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/hook")
    }

    fn client_for(url: Option<String>) -> ChatClient {
        ChatClient::new(&ChatConfig {
            webhook_url: url.map(SecretString::from),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_posts_message_and_session() {
        let url = spawn_webhook(Router::new().route(
            "/hook",
            post(|Json(body): Json<WebhookRequest>| async move {
                Json(serde_json::json!({
                    "output": format!("echo {} ({})", body.message, body.session_id)
                }))
            }),
        ))
        .await;

        let session = ChatSessionId::from_stored("sess-1").unwrap();
        let reply = client_for(Some(url)).send("hello", &session).await.unwrap();
        assert_eq!(reply, "echo hello (sess-1)");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let url = spawn_webhook(Router::new().route(
            "/hook",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        ))
        .await;

        let session = ChatSessionId::generate();
        let err = client_for(Some(url)).send("hi", &session).await.unwrap_err();
        assert!(matches!(err, ChatError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_reply_falls_back_on_bad_body() {
        let url = spawn_webhook(Router::new().route(
            "/hook",
            post(|| async { Json(serde_json::json!({"answer": "wrong shape"})) }),
        ))
        .await;

        let session = ChatSessionId::generate();
        let reply = client_for(Some(url)).reply("hi", &session).await;
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_unconfigured_client_falls_back() {
        let client = client_for(None);
        assert!(!client.is_configured());

        let session = ChatSessionId::generate();
        assert!(matches!(
            client.send("hi", &session).await,
            Err(ChatError::NotConfigured)
        ));
        assert_eq!(client.reply("hi", &session).await, FALLBACK_REPLY);
    }
}
