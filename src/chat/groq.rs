//! Groq provider using the OpenAI-compatible Chat Completions API.
//!
//! This module uses OpenAI terminology:
//! - "messages" (system prompt, then history, then the new user message)
//! - "choices" (we only read the first one)
//!
//! Requests are non-streaming; the reply is returned whole.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::client::{ChatClient, ChatError, RATE_LIMIT_MESSAGE};
use super::types::{ChatRequest, ChatRole};

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const NO_RESPONSE_TEXT: &str = "No response from AI";
pub const MISSING_KEY_MESSAGE: &str = "GROQ_API_KEY is not configured";

pub const DEFAULT_SYSTEM_PROMPT: &str = "Ty jsi webový AI terminálový asistent. \
    Odpovídáš stručně, přesně a technicky. \
    Používáš formátování vhodné pro terminál - krátké odstavce, seznamy s pomlčkami, a kód v backtickách. \
    Jsi přátelský ale profesionální. \
    Odpovídáš v češtině, pokud uživatel nepíše anglicky.";

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Debug, Clone)]
struct Message {
    role: Role,
    content: String,
}

#[derive(Serialize, Debug)]
struct CompletionsRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct CompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// System prompt first, then the prior turns, then the new message.
fn request_to_messages(system_prompt: &str, request: &ChatRequest) -> Vec<Message> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(Message {
        role: Role::System,
        content: system_prompt.to_string(),
    });
    messages.extend(request.history.iter().map(|turn| Message {
        role: match turn.role {
            ChatRole::User => Role::User,
            ChatRole::Assistant => Role::Assistant,
        },
        content: turn.content.clone(),
    }));
    messages.push(Message {
        role: Role::User,
        content: request.message.clone(),
    });
    messages
}

/// Text of the first choice, or the fallback when there is none.
fn first_choice_text(response: CompletionsResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string())
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Sampling and prompt settings for [`GroqClient`].
#[derive(Debug, Clone)]
pub struct GroqOptions {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl Default for GroqOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

pub struct GroqClient {
    api_key: Option<String>,
    options: GroqOptions,
    client: reqwest::Client,
}

impl GroqClient {
    /// Creates a new Groq client.
    ///
    /// A missing key is not an error here; every request then fails with
    /// `ChatError::Config` so the terminal stays usable for local commands.
    pub fn new(api_key: Option<String>, options: GroqOptions) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            options,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatClient for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("{}", MISSING_KEY_MESSAGE);
            return Err(ChatError::Config(MISSING_KEY_MESSAGE.to_string()));
        };

        let body = CompletionsRequest {
            model: self.options.model.clone(),
            messages: request_to_messages(&self.options.system_prompt, request),
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
            stream: false,
        };

        info!(
            "Groq request: model={}, message_count={}",
            body.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.options.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Groq response status: {}", status);

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Groq API error: {} - {}", status, err_body);
            if status.as_u16() == 429 {
                return Err(ChatError::RateLimited(RATE_LIMIT_MESSAGE.to_string()));
            }
            return Err(ChatError::Api {
                status: status.as_u16(),
                message: err_body,
            });
        }

        let parsed: CompletionsResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;
        info!("Groq response received");
        Ok(first_choice_text(parsed))
    }
}
