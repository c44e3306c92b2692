//! Deployment configuration: credentials, endpoints and model ids for the
//! chat backends, read from the environment into explicit structs that get
//! injected into the adapters.

use std::env;

use crate::providers::{ChatProvider, GeminiProvider, HfTextGenProvider, OpenAiProvider};

/// Settings for the chat-completion backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Empty when `OPENAI_API_KEY` is unset; the adapter then answers every
    /// call with the Unconfigured advisory instead of going to the network.
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        OpenAiConfig {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: "https://api.openai.com".to_string(),
            text_model: "gpt-3.5-turbo".to_string(),
            vision_model: "gpt-4o".to_string(),
        }
    }
}

/// Settings for the generative-content backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        GeminiConfig {
            api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            text_model: "gemini-1.5-flash-latest".to_string(),
            vision_model: "gemini-1.5-pro-latest".to_string(),
        }
    }
}

/// Settings for the text-generation-inference backend. One model only:
/// this backend cannot see images at all.
#[derive(Debug, Clone)]
pub struct HfConfig {
    pub api_token: String,
    pub base_url: String,
    pub model: String,
}

impl HfConfig {
    pub fn from_env() -> Self {
        HfConfig {
            api_token: env::var("HF_API_TOKEN").unwrap_or_default(),
            base_url: "https://api-inference.huggingface.co".to_string(),
            model: "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
        }
    }
}

/// Which backend this deployment talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderChoice {
    OpenAi,
    Gemini,
    HfTextGen,
}

impl ProviderChoice {
    /// Picks the backend from whichever credential is present in the
    /// environment, in priority order. With no credential at all this
    /// defaults to the chat-completion backend, whose adapter then reports
    /// the missing key as an Unconfigured advisory.
    pub fn detect() -> Self {
        if env_is_set("OPENAI_API_KEY") {
            ProviderChoice::OpenAi
        } else if env_is_set("GEMINI_API_KEY") {
            ProviderChoice::Gemini
        } else if env_is_set("HF_API_TOKEN") {
            ProviderChoice::HfTextGen
        } else {
            ProviderChoice::OpenAi
        }
    }
}

fn env_is_set(name: &str) -> bool {
    env::var(name).map(|value| !value.is_empty()).unwrap_or(false)
}

/// Builds the adapter for the chosen backend from its environment config.
pub fn build_provider(choice: ProviderChoice) -> Box<dyn ChatProvider> {
    match choice {
        ProviderChoice::OpenAi => Box::new(OpenAiProvider::new(OpenAiConfig::from_env())),
        ProviderChoice::Gemini => Box::new(GeminiProvider::new(GeminiConfig::from_env())),
        ProviderChoice::HfTextGen => Box::new(HfTextGenProvider::new(HfConfig::from_env())),
    }
}
