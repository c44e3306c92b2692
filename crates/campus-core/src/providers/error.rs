//! Classified provider failures — tells the caller *why* a backend call
//! failed so the right advisory can be shown.

use std::fmt;

/// Failure classification shared by every backend, whatever its native
/// error shape looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No credential configured; detected before any request is issued.
    Unconfigured,
    /// The backend rejected the credential.
    Unauthorized,
    /// Billing or quota exhausted.
    QuotaExceeded,
    /// Throttled by the backend.
    RateLimited,
    /// Anything else; `detail` preserves the native message.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ProviderFailure {
    pub fn unconfigured(detail: impl Into<String>) -> Self {
        ProviderFailure {
            kind: ErrorKind::Unconfigured,
            detail: detail.into(),
        }
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        ProviderFailure {
            kind: ErrorKind::Unknown,
            detail: detail.into(),
        }
    }

    /// Maps an HTTP rejection onto the shared taxonomy. The policy is the
    /// same for all backends: 401/403 means a bad key, 402 or a quota
    /// marker in a 429 body means billing, any other 429 means throttling.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => ErrorKind::Unauthorized,
            402 => ErrorKind::QuotaExceeded,
            429 if body.contains("insufficient_quota") => ErrorKind::QuotaExceeded,
            429 => ErrorKind::RateLimited,
            _ => ErrorKind::Unknown,
        };
        ProviderFailure {
            kind,
            detail: truncate_body(body),
        }
    }

    pub fn network(err: &reqwest::Error) -> Self {
        ProviderFailure {
            kind: ErrorKind::Unknown,
            detail: err.to_string(),
        }
    }

    /// True for the soft outcomes that are surfaced as displayable advisory
    /// text rather than a hard failure.
    pub fn is_advisory(&self) -> bool {
        self.kind != ErrorKind::Unknown
    }

    /// User-displayable message with the remediation for each soft kind.
    pub fn advisory(&self) -> String {
        match self.kind {
            // The adapter writes the full remediation, naming its own
            // credential variable.
            ErrorKind::Unconfigured => self.detail.clone(),
            ErrorKind::Unauthorized => {
                "The configured API key was rejected by the provider. \
                 Please check the credential in your environment variables."
                    .to_string()
            }
            ErrorKind::QuotaExceeded => {
                "Your account has exceeded its quota. Please add credits or \
                 raise your billing limit to continue using the AI features."
                    .to_string()
            }
            ErrorKind::RateLimited => {
                "Rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            ErrorKind::Unknown => format!("Error: {}. Please try again.", self.detail),
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider failure ({:?}): {}", self.kind, self.detail)
    }
}

impl std::error::Error for ProviderFailure {}

fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 300;
    if body.len() > LIMIT {
        let mut end = LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(ProviderFailure::from_status(401, "").kind, ErrorKind::Unauthorized);
        assert_eq!(ProviderFailure::from_status(403, "").kind, ErrorKind::Unauthorized);
        assert_eq!(ProviderFailure::from_status(402, "").kind, ErrorKind::QuotaExceeded);
        assert_eq!(ProviderFailure::from_status(429, "").kind, ErrorKind::RateLimited);
        assert_eq!(ProviderFailure::from_status(500, "boom").kind, ErrorKind::Unknown);
    }

    #[test]
    fn quota_marker_in_rate_limit_body_means_billing() {
        let failure = ProviderFailure::from_status(
            429,
            r#"{"error":{"code":"insufficient_quota","message":"out of credits"}}"#,
        );
        assert_eq!(failure.kind, ErrorKind::QuotaExceeded);
    }

    #[test]
    fn unknown_keeps_the_native_message() {
        let failure = ProviderFailure::from_status(500, "upstream exploded");
        assert_eq!(failure.detail, "upstream exploded");
        assert!(failure.advisory().contains("upstream exploded"));
        assert!(!failure.is_advisory());
    }

    #[test]
    fn soft_kinds_are_advisories() {
        for status in [401, 402, 429] {
            assert!(ProviderFailure::from_status(status, "").is_advisory());
        }
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(1000);
        let failure = ProviderFailure::from_status(500, &body);
        assert!(failure.detail.len() < 400);
        assert!(failure.detail.ends_with("..."));
    }
}
