pub mod client;
pub mod groq;
pub mod relay_client;
pub mod types;

pub use client::{CONNECTION_FAILED_MESSAGE, ChatClient, ChatError, RATE_LIMIT_MESSAGE};
pub use groq::{GroqClient, GroqOptions};
pub use relay_client::RelayClient;
pub use types::{ChatEnvelope, ChatRequest, ChatRole, ChatTurn, HISTORY_LIMIT};
