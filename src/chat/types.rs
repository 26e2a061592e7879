use serde::{Deserialize, Serialize};

/// Maximum number of prior turns sent along with a new message.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// The request body accepted by the relay: a new message plus recent turns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Builds a request, keeping only the newest `HISTORY_LIMIT` turns.
    pub fn new(message: impl Into<String>, mut history: Vec<ChatTurn>) -> Self {
        if history.len() > HISTORY_LIMIT {
            history.drain(..history.len() - HISTORY_LIMIT);
        }
        Self {
            message: message.into(),
            history,
        }
    }
}

/// The relay's reply envelope: exactly one of the two fields is set.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ChatEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatEnvelope {
    pub fn response(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(i: usize) -> ChatTurn {
        ChatTurn {
            role: if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant },
            content: format!("turn {i}"),
        }
    }

    #[test]
    fn test_request_truncates_history_to_newest() {
        let history: Vec<ChatTurn> = (0..14).map(turn).collect();
        let request = ChatRequest::new("hi", history);
        assert_eq!(request.history.len(), HISTORY_LIMIT);
        assert_eq!(request.history[0].content, "turn 4");
        assert_eq!(request.history[9].content, "turn 13");
    }

    #[test]
    fn test_request_serializes_lowercase_roles() {
        let request = ChatRequest::new("hello", vec![turn(0), turn(1)]);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""message":"hello""#));
        assert!(json.contains(r#""role":"user""#));
        assert!(json.contains(r#""role":"assistant""#));
    }

    #[test]
    fn test_request_history_defaults_to_empty() {
        let request: ChatRequest = serde_json::from_str(r#"{"message":"x"}"#).unwrap();
        assert!(request.history.is_empty());
    }

    #[test]
    fn test_envelope_omits_unset_field() {
        let ok = serde_json::to_string(&ChatEnvelope::response("yo")).unwrap();
        assert_eq!(ok, r#"{"response":"yo"}"#);
        let err = serde_json::to_string(&ChatEnvelope::error("bad")).unwrap();
        assert_eq!(err, r#"{"error":"bad"}"#);
    }
}
