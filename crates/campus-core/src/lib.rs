//! Conversation orchestration for the campus navigation assistant.
//!
//! Owns the session turn log, builds provider-agnostic requests from it,
//! and dispatches them to one of three interchangeable chat backends. The
//! backend is a deployment choice, made once from whichever credential is
//! configured in the environment.

pub mod config;
pub mod conversation;
pub mod locate;
pub mod message;
pub mod prompt;
pub mod providers;

pub use config::{build_provider, GeminiConfig, HfConfig, OpenAiConfig, ProviderChoice};
pub use conversation::{ChatReply, Conversation, SubmitError, GREETING};
pub use message::{HistoryTurn, ImageData, ProviderRequest, Role, Turn};
pub use providers::{
    ChatProvider, ErrorKind, GeminiProvider, HfTextGenProvider, OpenAiProvider, ProviderFailure,
    ProviderResult,
};
