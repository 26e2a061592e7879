//! Client for the relay backend (`bloby relay` or any compatible endpoint).
//!
//! Wire format: POST `{ message, history }`, answer `{ response }` or `{ error }`.

use async_trait::async_trait;
use log::{debug, info, warn};

use super::client::{ChatClient, ChatError, RATE_LIMIT_MESSAGE};
use super::types::{ChatEnvelope, ChatRequest};

pub struct RelayClient {
    url: String,
    client: reqwest::Client,
}

impl RelayClient {
    /// Creates a client posting to the full endpoint URL (e.g. `http://127.0.0.1:8787/chat`).
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Pulls the `error` field out of a body, if it is an envelope.
fn envelope_error(body: &str) -> Option<String> {
    serde_json::from_str::<ChatEnvelope>(body)
        .ok()
        .and_then(|env| env.error)
}

#[async_trait]
impl ChatClient for RelayClient {
    fn name(&self) -> &str {
        "relay"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        info!(
            "Relay request: url={}, history_len={}",
            self.url,
            request.history.len()
        );

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Relay response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if status.as_u16() == 429 {
            warn!("Relay rate limited: {}", body);
            let message = envelope_error(&body).unwrap_or_else(|| RATE_LIMIT_MESSAGE.to_string());
            return Err(ChatError::RateLimited(message));
        }

        if !status.is_success() {
            warn!("Relay error: {} - {}", status, body);
            return Err(match envelope_error(&body) {
                Some(message) => ChatError::Remote(message),
                None => ChatError::Api {
                    status: status.as_u16(),
                    message: body,
                },
            });
        }

        let envelope: ChatEnvelope =
            serde_json::from_str(&body).map_err(|e| ChatError::Parse(e.to_string()))?;
        match envelope {
            ChatEnvelope {
                error: Some(message),
                ..
            } => Err(ChatError::Remote(message)),
            ChatEnvelope {
                response: Some(text),
                ..
            } => Ok(text),
            _ => Err(ChatError::Parse("envelope has neither response nor error".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_error_extracts_message() {
        assert_eq!(
            envelope_error(r#"{"error":"nope"}"#),
            Some("nope".to_string())
        );
        assert_eq!(envelope_error(r#"{"response":"ok"}"#), None);
        assert_eq!(envelope_error("<html>502</html>"), None);
    }

    #[test]
    fn test_name() {
        let client = RelayClient::new("http://localhost:1/chat".into());
        assert_eq!(client.name(), "relay");
        assert_eq!(client.url(), "http://localhost:1/chat");
    }
}
