//! Single-purpose backend calls for location extraction. Thin delegations
//! to the same provider capability the conversation uses, with narrower
//! prompts; not part of the session turn log.

use anyhow::{bail, Result};

use crate::message::{ImageData, ProviderRequest};
use crate::prompt::{DETECT_LOCATION_PROMPT, PARSE_LOCATION_PROMPT};
use crate::providers::{ChatProvider, ErrorKind, ProviderResult};

const UNKNOWN_LOCATION: &str = "Unknown location - please describe where you are";

/// Asks the backend to identify the campus location shown in a photo.
///
/// Returns a short location guess ("Room 201", "Main Entrance", ...). When
/// no credential is configured the caller still gets usable text: the
/// advisory plus a fixed fallback location.
pub async fn describe_image(provider: &dyn ChatProvider, image: ImageData) -> Result<String> {
    let request = ProviderRequest {
        system_prompt: String::new(),
        history: Vec::new(),
        current_text: Some(DETECT_LOCATION_PROMPT.to_string()),
        current_image: Some(image),
    };

    match provider.invoke(&request).await {
        ProviderResult::Text(reply) => {
            let trimmed = reply.trim();
            Ok(if trimmed.is_empty() {
                UNKNOWN_LOCATION.to_string()
            } else {
                trimmed.to_string()
            })
        }
        ProviderResult::Failure(failure) if failure.kind == ErrorKind::Unconfigured => Ok(format!(
            "{} For now, using fallback: Main Entrance",
            failure.advisory()
        )),
        ProviderResult::Failure(failure) => {
            bail!("failed to detect location: {}", failure.advisory())
        }
    }
}

/// Normalizes a free-text location description ("I'm at the main door" ->
/// "Main Entrance"). Without a configured credential it falls back to a
/// local cleanup instead of failing.
pub async fn normalize_location_text(provider: &dyn ChatProvider, text: &str) -> Result<String> {
    if text.trim().is_empty() {
        bail!("no text provided");
    }

    let request = ProviderRequest {
        system_prompt: PARSE_LOCATION_PROMPT.to_string(),
        history: Vec::new(),
        current_text: Some(text.to_string()),
        current_image: None,
    };

    match provider.invoke(&request).await {
        ProviderResult::Text(reply) => {
            let trimmed = reply.trim();
            Ok(if trimmed.is_empty() {
                text.to_string()
            } else {
                trimmed.to_string()
            })
        }
        ProviderResult::Failure(failure) if failure.kind == ErrorKind::Unconfigured => {
            Ok(fallback_normalize(text))
        }
        ProviderResult::Failure(failure) => {
            bail!("failed to parse location: {}", failure.advisory())
        }
    }
}

// Local cleanup used when no backend is configured: strip one leading filler
// word and capitalize the first letter.
fn fallback_normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut stripped = lowered.trim();
    for prefix in ["i'm ", "i am ", "at ", "in ", "the "] {
        if let Some(rest) = stripped.strip_prefix(prefix) {
            stripped = rest.trim_start();
            break;
        }
    }

    let mut chars = stripped.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
