//! Text-generation-inference backend.
//!
//! Same linear flattening as the generative-content backend, but this one
//! cannot take image bytes at all — when the user attached a photo, the
//! current turn only carries a marker saying so.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::HfConfig;
use crate::message::ProviderRequest;
use crate::providers::{ChatProvider, ProviderFailure, ProviderResult};

/// Stands in for the photo the backend never sees.
pub const IMAGE_MARKER: &str = "[The user attached a photo of their surroundings]";

pub struct HfTextGenProvider {
    client: Client,
    config: HfConfig,
}

#[derive(Deserialize, Debug)]
struct GeneratedText {
    generated_text: String,
}

impl HfTextGenProvider {
    pub fn new(config: HfConfig) -> Self {
        HfTextGenProvider {
            client: Client::new(),
            config,
        }
    }

    fn build_inputs(&self, request: &ProviderRequest) -> String {
        let current = match (&request.current_image, request.current_text.as_deref()) {
            (Some(_), Some(text)) => Some(format!("{} {}", IMAGE_MARKER, text)),
            (Some(_), None) => Some(IMAGE_MARKER.to_string()),
            (None, Some(text)) => Some(text.to_string()),
            (None, None) => None,
        };
        let mut inputs = request.flattened_with_current(current.as_deref());
        inputs.push_str("\n\nAssistant:");
        inputs
    }
}

#[async_trait]
impl ChatProvider for HfTextGenProvider {
    fn name(&self) -> &'static str {
        "hf-text-generation"
    }

    async fn invoke(&self, request: &ProviderRequest) -> ProviderResult {
        if self.config.api_token.is_empty() {
            return ProviderResult::Failure(ProviderFailure::unconfigured(
                "The Hugging Face API token is not configured. Please set \
                 HF_API_TOKEN in your environment variables.",
            ));
        }

        let body = json!({
            "inputs": self.build_inputs(request),
            "parameters": {
                "max_new_tokens": 1000,
                "temperature": 0.7,
                "return_full_text": false,
            },
        });

        let url = format!("{}/models/{}", self.config.base_url, self.config.model);
        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return ProviderResult::Failure(ProviderFailure::network(&err)),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => return ProviderResult::Failure(ProviderFailure::network(&err)),
        };

        if !status.is_success() {
            return ProviderResult::Failure(ProviderFailure::from_status(status.as_u16(), &text));
        }

        match serde_json::from_str::<Vec<GeneratedText>>(&text) {
            Ok(parsed) => match parsed.into_iter().next() {
                Some(generated) => ProviderResult::Text(generated.generated_text.trim().to_string()),
                None => ProviderResult::Failure(ProviderFailure::unknown(
                    "empty text-generation response",
                )),
            },
            Err(err) => ProviderResult::Failure(ProviderFailure::unknown(format!(
                "unexpected text-generation response: {}",
                err
            ))),
        }
    }
}
