//! HTTP client for the text-generation endpoint.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::fmt;
use std::time::Duration;

use super::config::ExplanationConfig;
use super::prompt::{GenerateContentRequest, GenerateContentResponse};

/// Longest slice of an error body carried into the user-visible message.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Why an explanation could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplanationError {
    /// No API key was configured or entered.
    MissingApiKey,
    /// The HTTP client could not be constructed.
    ClientBuild(String),
    /// Connection, TLS or timeout failure.
    Transport(String),
    /// The endpoint answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The body was not the expected JSON.
    MalformedResponse(String),
}

impl fmt::Display for ExplanationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplanationError::MissingApiKey => write!(f, "Enter an API key to request an explanation"),
            ExplanationError::ClientBuild(e) => write!(f, "Failed to create HTTP client: {}", e),
            ExplanationError::Transport(e) => write!(f, "Network error: {}", e),
            ExplanationError::Status { status, body } => write!(f, "Explanation request failed ({}): {}", status, body),
            ExplanationError::MalformedResponse(e) => write!(f, "Unexpected response from explanation service: {}", e),
        }
    }
}

impl std::error::Error for ExplanationError {}

/// Anything that turns a prompt into explanation text.
pub trait ExplanationService: Send + Sync {
    fn generate_explanation(&self, api_key: &str, prompt: &str) -> Result<String, ExplanationError>;
}

/// Client for a Gemini-style `generateContent` endpoint.
pub struct ExplanationClient {
    client: Client,
    config: ExplanationConfig,
}

impl ExplanationClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ExplanationConfig) -> Result<Self, ExplanationError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| ExplanationError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }
}

impl ExplanationService for ExplanationClient {
    fn generate_explanation(&self, api_key: &str, prompt: &str) -> Result<String, ExplanationError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ExplanationError::MissingApiKey);
        }

        let request = GenerateContentRequest::new(prompt, &self.config);
        log::info!("Requesting explanation from {} ({} prompt chars)", self.config.endpoint, prompt.len());

        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .map_err(|e| ExplanationError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response.text().map_err(|e| ExplanationError::Transport(e.without_url().to_string()))?;
        interpret_response(status, &body)
    }
}

/// Stand-in used when the HTTP client could not be created at startup.
/// Every request fails with the reason the client could not be built.
pub struct UnavailableService {
    pub reason: String,
}

impl ExplanationService for UnavailableService {
    fn generate_explanation(&self, _api_key: &str, _prompt: &str) -> Result<String, ExplanationError> {
        Err(ExplanationError::ClientBuild(self.reason.clone()))
    }
}

/// Map a status and body to explanation text or an error.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<String, ExplanationError> {
    if !status.is_success() {
        log::warn!("Explanation request failed with status {}", status.as_u16());
        return Err(ExplanationError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    let parsed: GenerateContentResponse = serde_json::from_str(body).map_err(|e| ExplanationError::MalformedResponse(e.to_string()))?;
    Ok(parsed.into_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explanation::prompt::FALLBACK_EXPLANATION;

    #[test]
    fn success_extracts_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"EIRP is the sum of..."}]}}]}"#;
        assert_eq!(interpret_response(StatusCode::OK, body).unwrap(), "EIRP is the sum of...");
    }

    #[test]
    fn success_without_candidates_falls_back() {
        assert_eq!(interpret_response(StatusCode::OK, r#"{"promptFeedback":{}}"#).unwrap(), FALLBACK_EXPLANATION);
    }

    #[test]
    fn non_success_status_carries_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid"}}"#;
        let err = interpret_response(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert_eq!(
            err,
            ExplanationError::Status {
                status: 400,
                body: body.to_string()
            }
        );
        assert!(err.to_string().contains("API key not valid"));
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_CHARS * 2);
        match interpret_response(StatusCode::INTERNAL_SERVER_ERROR, &body).unwrap_err() {
            ExplanationError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = interpret_response(StatusCode::OK, "<html>gateway</html>").unwrap_err();
        assert!(matches!(err, ExplanationError::MalformedResponse(_)));
    }

    #[test]
    fn unavailable_service_reports_reason() {
        let service = UnavailableService {
            reason: "no TLS backend".to_string(),
        };
        let err = service.generate_explanation("key", "prompt").unwrap_err();
        assert_eq!(err.to_string(), "Failed to create HTTP client: no TLS backend");
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let config = ExplanationConfig {
            // Unroutable: a request would fail with Transport, not MissingApiKey
            endpoint: "http://127.0.0.1:9/generate".to_string(),
            ..Default::default()
        };
        let client = ExplanationClient::new(config).unwrap();
        assert_eq!(client.generate_explanation("   ", "prompt"), Err(ExplanationError::MissingApiKey));
    }
}
