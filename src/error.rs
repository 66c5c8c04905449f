//! Error types for the crew runtime.

use thiserror::Error;

/// Everything that can go wrong between reading the configuration and
/// collecting the last pipeline output.
#[derive(Debug, Error)]
pub enum CrewError {
    /// Missing or invalid configuration
    #[error("{0}")]
    Config(String),

    /// Request never reached the model service
    #[error("network error: {0}")]
    Transport(String),

    /// Model service answered with a non-success status
    #[error("api error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Response body could not be understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Pipeline wiring problem
    #[error("{0}")]
    Internal(String),
}

impl CrewError {
    /// Stable label reported as `error_kind` in failure envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            CrewError::Config(_) => "config",
            CrewError::Transport(_) => "transport",
            CrewError::Upstream { .. } => "upstream",
            CrewError::InvalidResponse(_) => "invalid_response",
            CrewError::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, CrewError>;

/// Strip anything that looks like a credential from an upstream error body.
pub fn sanitize_upstream_message(body: &str) -> String {
    let lower = body.to_lowercase();

    if lower.contains("invalid api key")
        || lower.contains("invalid_api_key")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
    {
        return "authentication failed; check GROQ_API_KEY".to_string();
    }

    if lower.contains("rate limit") || lower.contains("rate_limit") || lower.contains("quota") {
        return "rate limit exceeded".to_string();
    }

    let scrubbed: Vec<&str> = body
        .split_whitespace()
        .map(|word| if word.contains("gsk_") || word.contains("sk-") { "[redacted]" } else { word })
        .collect();
    let scrubbed = scrubbed.join(" ");

    const MAX_LEN: usize = 500;
    if scrubbed.chars().count() > MAX_LEN {
        let truncated: String = scrubbed.chars().take(MAX_LEN).collect();
        return format!("{truncated}...");
    }
    scrubbed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(CrewError::Config("x".into()).kind(), "config");
        assert_eq!(CrewError::Transport("x".into()).kind(), "transport");
        assert_eq!(
            CrewError::Upstream { status: 500, message: "x".into() }.kind(),
            "upstream"
        );
        assert_eq!(CrewError::InvalidResponse("x".into()).kind(), "invalid_response");
        assert_eq!(CrewError::Internal("x".into()).kind(), "internal");
    }

    #[test]
    fn test_display() {
        let err = CrewError::Upstream { status: 503, message: "overloaded".into() };
        assert_eq!(err.to_string(), "api error (503): overloaded");
        let err = CrewError::Config("GROQ_API_KEY environment variable is required".into());
        assert_eq!(err.to_string(), "GROQ_API_KEY environment variable is required");
    }

    #[test]
    fn test_sanitize_upstream_message() {
        let sanitized = sanitize_upstream_message(r#"{"error":{"message":"Invalid API Key"}}"#);
        assert!(sanitized.contains("GROQ_API_KEY"));

        let sanitized = sanitize_upstream_message("Rate limit reached for model");
        assert_eq!(sanitized, "rate limit exceeded");

        let sanitized = sanitize_upstream_message("bad request for gsk_abcdef123 today");
        assert!(!sanitized.contains("gsk_"));
        assert!(sanitized.contains("[redacted]"));

        let long = "x ".repeat(600);
        assert!(sanitize_upstream_message(&long).ends_with("..."));
    }
}
