//! HTTP API Clients
//!
//! This module handles:
//! - Text-analysis calls (health, analyze, compare, file upload)
//! - Authentication calls (login, register, logout, refresh, profile)
//!
//! Both clients are explicit values holding their base URL and an injected
//! token store; there is no global client instance.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::AuthClient;
pub use client::DetectorClient;

use crate::logic::validation::ValidationError;

/// API errors
///
/// Every operation converts its failure into one of these variants; no panic
/// or transport error escapes a client method, and nothing is retried
/// automatically. Retry is always a caller decision.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failure: the backend could not be reached
    Network(String),

    /// Non-2xx response, message extracted from the body when present
    Status { code: u16, message: String },

    /// Response body could not be parsed
    Parse(String),

    /// Input rejected before any request was made
    Invalid(ValidationError),

    /// The operation needs a stored token and the session has none
    NotAuthenticated,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(e) => write!(f, "Network error: {}", e),
            Self::Status { code, message } => write!(f, "Server error {}: {}", code, message),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::Invalid(e) => write!(f, "{}", e),
            Self::NotAuthenticated => write!(f, "Not authenticated"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Invalid(error)
    }
}

/// Turn an HTTP response into a typed result
///
/// 2xx bodies are decoded as JSON; anything else becomes `ApiError::Status`
/// with the message extracted from the body.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            code: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        })
    }
}

/// Extract a display message from an error response body
///
/// The backend reports failures as `{"error": ...}`, `{"detail": ...}` or
/// `{"message": ...}` depending on the endpoint; fall back to the bare
/// status code when the body carries none of them.
pub(crate) fn error_message(code: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "detail", "message"].iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
        })
        .unwrap_or_else(|| format!("HTTP {}", code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_error_field() {
        let body = r#"{"error":"Formato JSON inválido","detail":"ignored"}"#;
        assert_eq!(error_message(400, body), "Formato JSON inválido");
    }

    #[test]
    fn test_error_message_falls_back_to_detail() {
        let body = r#"{"detail":"Token expirado"}"#;
        assert_eq!(error_message(401, body), "Token expirado");
    }

    #[test]
    fn test_error_message_falls_back_to_status_code() {
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "HTTP 502");
        assert_eq!(error_message(500, r#"{"other":"field"}"#), "HTTP 500");
    }

    #[test]
    fn test_validation_error_converts() {
        let error: ApiError = ValidationError::EmptyInput.into();
        assert_eq!(
            error,
            ApiError::Invalid(ValidationError::EmptyInput)
        );
    }
}
