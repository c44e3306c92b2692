//! Generative-content backend.
//!
//! The system prompt and replayed history are flattened into one linear
//! text block with role prefixes; a photo is attached as a separate
//! inline-data part next to the text.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::GeminiConfig;
use crate::message::ProviderRequest;
use crate::providers::{ChatProvider, ProviderFailure, ProviderResult};

pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

// --- Structs for deserializing Gemini API responses ---
#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Self {
        GeminiProvider {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn invoke(&self, request: &ProviderRequest) -> ProviderResult {
        if self.config.api_key.is_empty() {
            return ProviderResult::Failure(ProviderFailure::unconfigured(
                "The Gemini API key is not configured. Please set GEMINI_API_KEY \
                 in your environment variables.",
            ));
        }

        let mut parts = vec![json!({ "text": request.flattened_transcript() })];
        if let Some(image) = &request.current_image {
            parts.push(json!({
                "inline_data": {
                    "mime_type": image.mime_type,
                    "data": STANDARD.encode(&image.bytes),
                }
            }));
        }
        let body = json!({ "contents": [{ "parts": parts }] });

        let model = if request.has_image() {
            &self.config.vision_model
        } else {
            &self.config.text_model
        };
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        );

        let response = match self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
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

        match serde_json::from_str::<GeminiResponse>(&text) {
            Ok(parsed) => {
                let reply = parsed
                    .candidates
                    .into_iter()
                    .next()
                    .and_then(|candidate| {
                        candidate
                            .content
                            .parts
                            .into_iter()
                            .find_map(|part| part.text)
                    })
                    .filter(|reply| !reply.is_empty());
                match reply {
                    Some(reply) => ProviderResult::Text(reply),
                    None => ProviderResult::Failure(ProviderFailure::unknown(
                        "no text in generate-content response",
                    )),
                }
            }
            Err(err) => ProviderResult::Failure(ProviderFailure::unknown(format!(
                "unexpected generate-content response: {}",
                err
            ))),
        }
    }
}
