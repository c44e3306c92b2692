//! Session orchestration: the append-only turn log and the submit cycle.

use std::fmt;

use crate::message::{HistoryTurn, ImageData, ProviderRequest, Turn};
use crate::prompt::SYSTEM_PROMPT;
use crate::providers::{ChatProvider, ProviderResult};

/// The canned opening message shown when a session starts.
pub const GREETING: &str = "Hello! I'm your BMCC campus navigation assistant. 🗺️\n\n\
Where would you like to go today? Please tell me:\n\n\
1. **Your current location** - You can either:\n   \
• Type where you are (e.g., \"Main entrance\", \"Room 201\", \"Library\")\n   \
• Upload a photo of your surroundings\n\n\
2. **Your destination** - Where do you want to navigate to?\n\n\
I'll help you find the best route! 📍";

/// What one submit cycle hands back to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// The model answered; the reply is already appended to the turn log.
    Assistant(String),
    /// A soft provider outcome returned for display only. Nothing is
    /// appended to the log on the assistant's behalf.
    Advisory(String),
}

#[derive(Debug)]
pub enum SubmitError {
    /// Neither text nor image was provided; rejected before any turn is
    /// appended or any provider call is made.
    NoContent,
    /// Unclassified provider failure, with the native message preserved.
    Provider { detail: String },
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::NoContent => write!(f, "no message or image provided"),
            SubmitError::Provider { detail } => write!(f, "provider call failed: {}", detail),
        }
    }
}

impl std::error::Error for SubmitError {}

/// One session's conversation: the turn log plus the backend it talks to.
///
/// The log is append-only and owned exclusively by this instance; rendering
/// collaborators read it through [`Conversation::turns`].
pub struct Conversation {
    turns: Vec<Turn>,
    provider: Box<dyn ChatProvider>,
}

impl Conversation {
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Conversation {
            turns: Vec::new(),
            provider,
        }
    }

    /// Starts the session with the canned assistant greeting, the way the
    /// chat surface opens a conversation.
    pub fn with_greeting(provider: Box<dyn ChatProvider>) -> Self {
        let mut conversation = Conversation::new(provider);
        conversation.turns.push(Turn::assistant(GREETING));
        conversation
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Drives one request/response cycle: append the user turn, call the
    /// backend, and append the assistant reply on success. Soft provider
    /// failures come back as an advisory for the caller to display.
    pub async fn submit(
        &mut self,
        text: Option<String>,
        image: Option<ImageData>,
    ) -> Result<ChatReply, SubmitError> {
        let text = text.filter(|text| !text.trim().is_empty());
        if text.is_none() && image.is_none() {
            return Err(SubmitError::NoContent);
        }

        self.turns
            .push(Turn::user(text.clone().unwrap_or_default(), image));

        let request = {
            let (history, current) = self.turns.split_at(self.turns.len() - 1);
            ProviderRequest {
                system_prompt: SYSTEM_PROMPT.to_string(),
                history: history
                    .iter()
                    .map(|turn| HistoryTurn {
                        role: turn.role,
                        content: turn.content.clone(),
                    })
                    .collect(),
                current_text: text,
                current_image: current[0].image.clone(),
            }
        };

        match self.provider.invoke(&request).await {
            ProviderResult::Text(reply) => {
                self.turns.push(Turn::assistant(reply.clone()));
                Ok(ChatReply::Assistant(reply))
            }
            ProviderResult::Failure(failure) if failure.is_advisory() => {
                Ok(ChatReply::Advisory(failure.advisory()))
            }
            ProviderResult::Failure(failure) => Err(SubmitError::Provider {
                detail: failure.detail,
            }),
        }
    }
}
