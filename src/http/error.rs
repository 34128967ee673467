//! Error taxonomy for backend API calls.

use log::debug;
use reqwest::{Response, StatusCode};

/// Errors surfaced to callers of the API gateway client.
///
/// Each variant carries a human-readable message, preferring a
/// backend-supplied detail string over the status-keyed default.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Malformed input rejected locally, before any network call
    InvalidInput(String),
    /// HTTP 401 after the single refresh-and-retry cycle is exhausted
    AuthenticationRequired(String),
    /// HTTP 403
    Forbidden(String),
    /// HTTP 404
    NotFound(String),
    /// HTTP 5xx
    ServerError(String),
    /// No response received (connect failure or client-side timeout)
    NetworkUnreachable(String),
    /// Any other uncategorized status
    Unknown(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ApiError::AuthenticationRequired(msg) => {
                write!(f, "Authentication required: {}", msg)
            }
            ApiError::Forbidden(msg) => write!(f, "Access forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ServerError(msg) => write!(f, "Server error: {}", msg),
            ApiError::NetworkUnreachable(msg) => write!(f, "Network unreachable: {}", msg),
            ApiError::Unknown(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Classifies a non-success HTTP status into the error taxonomy.
    /// `detail` is the message extracted from the response body, if any.
    pub fn from_status(status: StatusCode, detail: Option<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::AuthenticationRequired(
                detail.unwrap_or_else(|| "Sign in to continue".to_string()),
            ),
            StatusCode::FORBIDDEN => ApiError::Forbidden(
                detail.unwrap_or_else(|| "Access to this resource is forbidden".to_string()),
            ),
            StatusCode::NOT_FOUND => ApiError::NotFound(
                detail.unwrap_or_else(|| "The requested resource was not found".to_string()),
            ),
            s if s.is_server_error() => ApiError::ServerError(
                detail.unwrap_or_else(|| "The server failed to process the request".to_string()),
            ),
            s => ApiError::Unknown(detail.unwrap_or_else(|| format!("HTTP {} error", s.as_u16()))),
        }
    }
}

/// Extracts a backend-supplied detail string from an error response body.
/// Looks for `{"detail": "..."}` (or `"message"`), the shapes the backend
/// emits across versions. Consumes the response.
pub async fn response_detail(response: Response) -> Option<String> {
    let text = response.text().await.ok()?;
    let value: serde_json::Value = serde_json::from_str(&text).ok()?;
    for key in ["detail", "message"] {
        if let Some(detail) = value.get(key).and_then(|v| v.as_str()) {
            return Some(detail.to_string());
        }
    }
    debug!("error response body carried no detail field: {}", text);
    None
}
