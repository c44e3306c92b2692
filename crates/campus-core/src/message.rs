//! The conversation data model shared by every chat backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Raw image payload as uploaded by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// One exchange unit in a session's turn log.
///
/// Turns are immutable once appended; their order carries the conversation
/// semantics and is never rewritten.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    /// May be empty when an image carries the meaning.
    pub content: String,
    /// Present only on user turns that included a photo.
    pub image: Option<ImageData>,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>, image: Option<ImageData>) -> Self {
        Turn {
            role: Role::User,
            content: content.into(),
            image,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Turn {
            role: Role::Assistant,
            content: content.into(),
            image: None,
            timestamp: Utc::now(),
        }
    }
}

/// A prior turn projected down to what history replay carries. Image bytes
/// are never replayed for history turns, only for the current one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub role: Role,
    pub content: String,
}

/// Everything a backend needs for one model call. Assembled fresh per
/// invocation and never retained.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// May be empty for single-purpose calls that carry their instructions
    /// in the current text instead.
    pub system_prompt: String,
    pub history: Vec<HistoryTurn>,
    pub current_text: Option<String>,
    pub current_image: Option<ImageData>,
}

impl ProviderRequest {
    pub fn has_image(&self) -> bool {
        self.current_image.is_some()
    }

    /// System prompt and replayed history as one linear text block with
    /// "User:"/"Assistant:" turn prefixes, for backends that cannot take
    /// role-tagged messages.
    pub(crate) fn flattened_history(&self) -> String {
        let mut transcript = String::new();
        if !self.system_prompt.is_empty() {
            transcript.push_str(&self.system_prompt);
        }
        for turn in &self.history {
            if !transcript.is_empty() {
                transcript.push_str("\n\n");
            }
            transcript.push_str(match turn.role {
                Role::User => "User: ",
                Role::Assistant => "Assistant: ",
            });
            transcript.push_str(&turn.content);
        }
        transcript
    }

    /// The flattened history followed by the new user turn.
    pub fn flattened_transcript(&self) -> String {
        self.flattened_with_current(self.current_text.as_deref())
    }

    pub(crate) fn flattened_with_current(&self, current: Option<&str>) -> String {
        let mut transcript = self.flattened_history();
        if let Some(text) = current {
            if !transcript.is_empty() {
                transcript.push_str("\n\n");
            }
            transcript.push_str("User: ");
            transcript.push_str(text);
        }
        transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_history() -> ProviderRequest {
        ProviderRequest {
            system_prompt: "You are a guide.".to_string(),
            history: vec![
                HistoryTurn {
                    role: Role::User,
                    content: "I'm at the library".to_string(),
                },
                HistoryTurn {
                    role: Role::Assistant,
                    content: "Where to?".to_string(),
                },
            ],
            current_text: Some("Room 201".to_string()),
            current_image: None,
        }
    }

    #[test]
    fn flattening_prefixes_roles_in_order() {
        let transcript = request_with_history().flattened_transcript();
        assert_eq!(
            transcript,
            "You are a guide.\n\nUser: I'm at the library\n\nAssistant: Where to?\n\nUser: Room 201"
        );
    }

    #[test]
    fn flattening_skips_an_empty_system_prompt() {
        let mut request = request_with_history();
        request.system_prompt = String::new();
        let transcript = request.flattened_transcript();
        assert!(transcript.starts_with("User: I'm at the library"));
    }

    #[test]
    fn flattening_without_current_text_ends_on_history() {
        let mut request = request_with_history();
        request.current_text = None;
        let transcript = request.flattened_transcript();
        assert!(transcript.ends_with("Assistant: Where to?"));
    }
}
