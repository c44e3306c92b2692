//! Chat-completion backend.
//!
//! Turns map directly onto role-tagged message entries; a photo rides along
//! as an inline data URL on the current turn's content.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::OpenAiConfig;
use crate::message::ProviderRequest;
use crate::providers::{ChatProvider, ProviderFailure, ProviderResult};

const EMPTY_REPLY: &str = "Sorry, I could not generate a response.";

pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        OpenAiProvider {
            client: Client::new(),
            config,
        }
    }

    fn build_messages(&self, request: &ProviderRequest) -> Vec<Value> {
        let mut messages = Vec::new();

        if !request.system_prompt.is_empty() {
            messages.push(json!({
                "role": "system",
                "content": request.system_prompt,
            }));
        }

        for turn in &request.history {
            messages.push(json!({
                "role": turn.role.as_str(),
                "content": turn.content,
            }));
        }

        let content = match (&request.current_image, &request.current_text) {
            (Some(image), text) => {
                let mut parts = vec![json!({
                    "type": "image_url",
                    "image_url": {
                        "url": format!(
                            "data:{};base64,{}",
                            image.mime_type,
                            STANDARD.encode(&image.bytes)
                        ),
                    },
                })];
                if let Some(text) = text {
                    parts.push(json!({ "type": "text", "text": text }));
                }
                Value::Array(parts)
            }
            (None, Some(text)) => Value::String(text.clone()),
            (None, None) => Value::String(String::new()),
        };

        messages.push(json!({ "role": "user", "content": content }));
        messages
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn invoke(&self, request: &ProviderRequest) -> ProviderResult {
        if self.config.api_key.is_empty() {
            return ProviderResult::Failure(ProviderFailure::unconfigured(
                "The OpenAI API key is not configured. Please set OPENAI_API_KEY \
                 in your environment variables.",
            ));
        }

        let model = if request.has_image() {
            &self.config.vision_model
        } else {
            &self.config.text_model
        };

        let body = json!({
            "model": model,
            "messages": self.build_messages(request),
            "max_tokens": 1000,
            "temperature": 0.7,
        });

        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
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

        match serde_json::from_str::<ChatCompletionResponse>(&text) {
            Ok(parsed) => {
                let reply = parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .filter(|content| !content.is_empty())
                    .unwrap_or_else(|| EMPTY_REPLY.to_string());
                ProviderResult::Text(reply)
            }
            Err(err) => ProviderResult::Failure(ProviderFailure::unknown(format!(
                "unexpected chat completion response: {}",
                err
            ))),
        }
    }
}
