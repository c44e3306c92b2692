//! Wire-shape and classification tests for the chat backends, against a
//! local mock server standing in for each hosted API.

use campus_core::{
    ChatProvider, ErrorKind, GeminiConfig, GeminiProvider, HfConfig, HfTextGenProvider,
    HistoryTurn, ImageData, OpenAiConfig, OpenAiProvider, ProviderRequest, ProviderResult, Role,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn openai_config(server: &MockServer, api_key: &str) -> OpenAiConfig {
    OpenAiConfig {
        api_key: api_key.to_string(),
        base_url: server.uri(),
        text_model: "gpt-3.5-turbo".to_string(),
        vision_model: "gpt-4o".to_string(),
    }
}

fn gemini_config(server: &MockServer, api_key: &str) -> GeminiConfig {
    GeminiConfig {
        api_key: api_key.to_string(),
        base_url: server.uri(),
        text_model: "gemini-1.5-flash-latest".to_string(),
        vision_model: "gemini-1.5-pro-latest".to_string(),
    }
}

fn hf_config(server: &MockServer, api_token: &str) -> HfConfig {
    HfConfig {
        api_token: api_token.to_string(),
        base_url: server.uri(),
        model: "test-org/test-model".to_string(),
    }
}

fn request_with(history: Vec<HistoryTurn>, text: Option<&str>, image: bool) -> ProviderRequest {
    ProviderRequest {
        system_prompt: "You are a campus guide.".to_string(),
        history,
        current_text: text.map(str::to_string),
        current_image: image.then(|| ImageData {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            mime_type: "image/jpeg".to_string(),
        }),
    }
}

fn sample_history() -> Vec<HistoryTurn> {
    vec![
        HistoryTurn {
            role: Role::User,
            content: "I'm at the library".to_string(),
        },
        HistoryTurn {
            role: Role::Assistant,
            content: "Where would you like to go?".to_string(),
        },
    ]
}

async fn recorded_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    serde_json::from_slice(&requests[0].body).expect("request body is JSON")
}

#[tokio::test]
async fn unconfigured_adapters_never_touch_the_network() {
    let server = MockServer::start().await;
    // Any request arriving here fails the test when the mock verifies.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = request_with(Vec::new(), Some("hello"), false);

    let openai = OpenAiProvider::new(openai_config(&server, ""));
    let gemini = GeminiProvider::new(gemini_config(&server, ""));
    let hf = HfTextGenProvider::new(hf_config(&server, ""));

    for (provider, credential) in [
        (&openai as &dyn ChatProvider, "OPENAI_API_KEY"),
        (&gemini as &dyn ChatProvider, "GEMINI_API_KEY"),
        (&hf as &dyn ChatProvider, "HF_API_TOKEN"),
    ] {
        match provider.invoke(&request).await {
            ProviderResult::Failure(failure) => {
                assert_eq!(failure.kind, ErrorKind::Unconfigured);
                assert!(failure.advisory().contains(credential));
            }
            other => panic!("expected Unconfigured, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn chat_completion_maps_roles_and_picks_the_vision_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "Got it, you're at the library." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(openai_config(&server, "test-key"));
    let request = request_with(sample_history(), Some("Room 305 please"), true);

    let result = provider.invoke(&request).await;
    assert_eq!(
        result,
        ProviderResult::Text("Got it, you're at the library.".to_string())
    );

    let body = recorded_body(&server).await;
    assert_eq!(body["model"], "gpt-4o");

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "I'm at the library");
    assert_eq!(messages[2]["role"], "assistant");

    // Current turn: image part first, then the text part.
    let content = messages[3]["content"].as_array().unwrap();
    assert_eq!(content[0]["type"], "image_url");
    let url = content[0]["image_url"]["url"].as_str().unwrap();
    assert!(url.starts_with("data:image/jpeg;base64,"));
    assert_eq!(content[1]["type"], "text");
    assert_eq!(content[1]["text"], "Room 305 please");
}

#[tokio::test]
async fn chat_completion_without_image_uses_the_text_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "Sure." } }]
        })))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(openai_config(&server, "test-key"));
    let request = request_with(Vec::new(), Some("hello"), false);
    provider.invoke(&request).await;

    let body = recorded_body(&server).await;
    assert_eq!(body["model"], "gpt-3.5-turbo");
    // Text-only current turns are plain string content.
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.last().unwrap()["content"], "hello");
}

#[tokio::test]
async fn chat_completion_error_classification() {
    for (status, body, expected) in [
        (401u16, json!({"error": {"message": "bad key"}}), ErrorKind::Unauthorized),
        (
            429,
            json!({"error": {"code": "insufficient_quota", "message": "no credits"}}),
            ErrorKind::QuotaExceeded,
        ),
        (429, json!({"error": {"message": "slow down"}}), ErrorKind::RateLimited),
        (500, json!({"error": {"message": "boom"}}), ErrorKind::Unknown),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(openai_config(&server, "test-key"));
        let request = request_with(Vec::new(), Some("hello"), false);

        match provider.invoke(&request).await {
            ProviderResult::Failure(failure) => assert_eq!(failure.kind, expected),
            other => panic!("expected failure for {}, got {:?}", status, other),
        }
    }
}

#[tokio::test]
async fn generative_content_flattens_history_and_inlines_the_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro-latest:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Head to the courtyard." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(gemini_config(&server, "test-key"));
    let request = request_with(sample_history(), Some("Room 305 please"), true);

    let result = provider.invoke(&request).await;
    assert_eq!(
        result,
        ProviderResult::Text("Head to the courtyard.".to_string())
    );

    let requests = server.received_requests().await.unwrap();
    let header = requests[0]
        .headers
        .get("x-goog-api-key")
        .expect("api key header");
    assert_eq!(header.to_str().unwrap(), "test-key");

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);

    let transcript = parts[0]["text"].as_str().unwrap();
    assert!(transcript.starts_with("You are a campus guide."));
    assert!(transcript.contains("User: I'm at the library"));
    assert!(transcript.contains("Assistant: Where would you like to go?"));
    assert!(transcript.ends_with("User: Room 305 please"));

    assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
    assert!(parts[1]["inline_data"]["data"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn generative_content_without_image_uses_the_text_model_and_one_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash-latest:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Sure." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(gemini_config(&server, "test-key"));
    let request = request_with(Vec::new(), Some("hello"), false);

    let result = provider.invoke(&request).await;
    assert_eq!(result, ProviderResult::Text("Sure.".to_string()));

    let body = recorded_body(&server).await;
    assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn text_generation_marks_the_image_instead_of_sending_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/test-org/test-model"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "generated_text": " Thanks, I see you sent a photo. " }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HfTextGenProvider::new(hf_config(&server, "test-token"));
    let request = request_with(sample_history(), Some("where am I?"), true);

    let result = provider.invoke(&request).await;
    assert_eq!(
        result,
        ProviderResult::Text("Thanks, I see you sent a photo.".to_string())
    );

    let body = recorded_body(&server).await;
    let inputs = body["inputs"].as_str().unwrap();
    assert!(inputs.contains("[The user attached a photo of their surroundings] where am I?"));
    assert!(inputs.ends_with("Assistant:"));
    // The raw bytes never leave the process on this backend.
    assert!(!inputs.contains("base64"));
    assert!(body.get("parameters").is_some());
}

#[tokio::test]
async fn text_generation_rate_limit_is_soft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429).set_body_string("{\"error\":\"Model too busy\"}"),
        )
        .mount(&server)
        .await;

    let provider = HfTextGenProvider::new(hf_config(&server, "test-token"));
    let request = request_with(Vec::new(), Some("hello"), false);

    match provider.invoke(&request).await {
        ProviderResult::Failure(failure) => {
            assert_eq!(failure.kind, ErrorKind::RateLimited);
            assert!(failure.is_advisory());
        }
        other => panic!("expected rate-limit failure, got {:?}", other),
    }
}
