//! Chat assistant client.
//!
//! POSTs `{"message": ...}` to the configured endpoint and expects
//! `{"response": ...}`. Every failure mode (transport, non-2xx, malformed
//! body, empty response) is masked by a local fallback reply, so the widget
//! never shows an error to the shopper.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

/// How much of the prompt the fallback echoes back.
const FALLBACK_ECHO_LENGTH: usize = 80;

/// Request timeout for the assistant endpoint.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the assistant endpoint. Internal only: callers of [`ask`]
/// always get a reply string.
///
/// [`ask`]: AssistantClient::ask
#[derive(Debug, Error)]
pub enum AssistantError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-success status.
    #[error("Assistant returned status {0}")]
    Status(u16),

    /// The body parsed but carried no reply.
    #[error("Assistant response was empty")]
    EmptyResponse,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct AskResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Client for the chat assistant endpoint.
#[derive(Clone)]
pub struct AssistantClient {
    inner: Arc<AssistantClientInner>,
}

struct AssistantClientInner {
    client: reqwest::Client,
    endpoint: String,
}

impl AssistantClient {
    /// Create a new assistant client.
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(AssistantClientInner {
                client,
                endpoint: endpoint.to_string(),
            }),
        }
    }

    /// Ask the assistant. Always returns a reply: endpoint failures are
    /// logged and replaced with the local fallback.
    #[instrument(skip(self, message))]
    pub async fn ask(&self, message: &str) -> String {
        match self.try_ask(message).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Assistant endpoint failed, using local fallback: {e}");
                fallback_reply(message)
            }
        }
    }

    async fn try_ask(&self, message: &str) -> Result<String, AssistantError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&AskRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Status(status.as_u16()));
        }

        let body: AskResponse = response.json().await?;
        body.response
            .filter(|r| !r.is_empty())
            .ok_or(AssistantError::EmptyResponse)
    }
}

/// The canned reply used when the endpoint is unreachable: a truncated echo
/// of the question plus a product summary.
#[must_use]
pub fn fallback_reply(prompt: &str) -> String {
    let echo: String = prompt.chars().take(FALLBACK_ECHO_LENGTH).collect();
    format!(
        "Thanks for your question!\n\n\
         I don't have access to the AI backend right now, but here's a helpful summary: \
         (You asked: {echo}...)\n\n\
         Products we offer: Vrindavan Prem (perfume), Coco-Peat, Coconut husk plates, and Bricket. \
         You can ask about product details, delivery, payment options, or partnerships."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_echoes_prompt() {
        let reply = fallback_reply("What is coco-peat?");
        assert!(reply.contains("(You asked: What is coco-peat?...)"));
        assert!(reply.contains("Vrindavan Prem"));
    }

    #[test]
    fn test_fallback_truncates_long_prompts() {
        let prompt = "x".repeat(200);
        let reply = fallback_reply(&prompt);
        assert!(reply.contains(&"x".repeat(80)));
        assert!(!reply.contains(&"x".repeat(81)));
    }

    #[test]
    fn test_fallback_handles_multibyte_prompts() {
        // Truncation is by character, not byte, so this must not panic
        let prompt = "🌱".repeat(100);
        let reply = fallback_reply(&prompt);
        assert!(reply.contains(&"🌱".repeat(80)));
    }
}
