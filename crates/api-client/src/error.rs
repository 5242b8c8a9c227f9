//! Error types for the API client

use std::fmt;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
///
/// Every failure propagates to the caller unchanged; the client never retries
/// or swallows any of them.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a status outside the 2xx range
    #[error("HTTP error! status: {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// A successful response carried a body that is not valid JSON for the target type
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A caller-supplied header name or value is not valid HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A value handed to a constructor breaks a data-model invariant
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// Create a status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// HTTP status code, when the backend answered at all
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the request failed before a response arrived
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if the response body could not be decoded
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }
}

/// Error context for log lines
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Request ID for correlation
    pub request_id: Option<String>,
    /// URL that was called
    pub url: String,
    /// HTTP method used
    pub method: String,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)?;
        if let Some(ref id) = self.request_id {
            write!(f, " (request_id: {id})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_embeds_code() {
        let err = ApiError::status(404, "not found");
        assert_eq!(err.to_string(), "HTTP error! status: 404");
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_server_error_classification() {
        let err = ApiError::status(503, "");
        assert!(err.is_server_error());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_decode_classification() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = ApiError::Decode(json_err);
        assert!(err.is_decode());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext {
            request_id: Some("abc".to_string()),
            url: "http://localhost:8080/api/test".to_string(),
            method: "GET".to_string(),
        };
        assert_eq!(
            ctx.to_string(),
            "GET http://localhost:8080/api/test (request_id: abc)"
        );
    }
}
