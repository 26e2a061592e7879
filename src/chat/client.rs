use std::fmt;

use async_trait::async_trait;

use super::types::ChatRequest;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const CONNECTION_FAILED_MESSAGE: &str = "Connection failed. Please try again.";

/// Errors that can occur while asking a collaborator for a reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Client misconfigured (missing API key, bad URL).
    Config(String),
    /// Transport failure (DNS, connection refused, reset).
    Network(String),
    /// Upstream answered HTTP 429.
    RateLimited(String),
    /// Non-2xx response without a usable error payload.
    Api { status: u16, message: String },
    /// The collaborator answered with an explicit `{ "error": ... }` payload.
    Remote(String),
    /// The response body could not be decoded.
    Parse(String),
}

impl ChatError {
    /// Text shown to the operator after the `Error: ` prefix.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Config(msg) => msg.clone(),
            ChatError::Network(_) => CONNECTION_FAILED_MESSAGE.to_string(),
            ChatError::RateLimited(msg) if msg.is_empty() => RATE_LIMIT_MESSAGE.to_string(),
            ChatError::RateLimited(msg) => msg.clone(),
            ChatError::Api { status, .. } => format!("Failed to get response (HTTP {status})"),
            ChatError::Remote(msg) => msg.clone(),
            ChatError::Parse(_) => "Failed to get response".to_string(),
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Config(msg) => write!(f, "config error: {msg}"),
            ChatError::Network(msg) => write!(f, "network error: {msg}"),
            ChatError::RateLimited(msg) => write!(f, "rate limited: {msg}"),
            ChatError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ChatError::Remote(msg) => write!(f, "remote error: {msg}"),
            ChatError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ChatError {}

/// Anything that can turn a message plus recent history into a reply.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Returns the name of the collaborator, for logs and the status bar.
    fn name(&self) -> &str;

    /// Sends one request and waits for the complete reply.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_message_differs_from_network() {
        let limited = ChatError::RateLimited(String::new()).user_message();
        let network = ChatError::Network("refused".into()).user_message();
        assert_eq!(limited, RATE_LIMIT_MESSAGE);
        assert_eq!(network, CONNECTION_FAILED_MESSAGE);
        assert_ne!(limited, network);
    }

    #[test]
    fn test_remote_error_is_passed_through() {
        let err = ChatError::Remote("GROQ_API_KEY is not configured".into());
        assert_eq!(err.user_message(), "GROQ_API_KEY is not configured");
    }

    #[test]
    fn test_display_includes_status() {
        let err = ChatError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 502): bad gateway");
    }
}
