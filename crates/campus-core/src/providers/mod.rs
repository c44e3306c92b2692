//! Chat backends: three interchangeable providers behind one capability
//! trait. Which one runs is a deployment choice, never a runtime branch.

mod error;
mod gemini;
mod hf;
mod openai;

pub use error::{ErrorKind, ProviderFailure};
pub use gemini::GeminiProvider;
pub use hf::HfTextGenProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;

use crate::message::ProviderRequest;

/// Outcome of one backend call: assistant text, or a classified failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResult {
    Text(String),
    Failure(ProviderFailure),
}

/// The capability every backend satisfies: given a system prompt, prior
/// turns and optionally an image, return assistant text or a classified
/// failure. Implementations must check their credential before issuing any
/// network request, and must never surface a raw transport error.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn invoke(&self, request: &ProviderRequest) -> ProviderResult;
}
