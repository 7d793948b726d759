//! Error types for dump-core

use serde::Deserialize;
use thiserror::Error;

/// Result type alias using dump-core's error
pub type Result<T> = std::result::Result<T, ApiError>;

const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Errors surfaced by the API client and the state containers.
///
/// `Display` is the human-readable message shown to the user.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request body could not be serialized
    #[error("Failed to encode request: {0}")]
    EncodingFailed(#[source] serde_json::Error),

    /// DNS, timeout, or transport failure
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-2xx status without a dedicated variant
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    DecodingFailed(#[source] serde_json::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rejected by the server (400) or by client-side validation
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("{0}")]
    Conflict(String),

    /// Blob store rejected a signed-URL upload
    #[error("Upload failed (HTTP {0})")]
    UploadFailed(u16),

    /// Token provider could not supply a bearer token
    #[error("Not authenticated")]
    NoAuthToken,

    /// Local upload source could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Local flag persistence failed
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown error occurred")]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

impl ApiError {
    /// Shorthand for a client-side validation failure.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Maps a non-2xx response to a typed error.
    ///
    /// The body is decoded as `{"error": "..."}`; any other shape falls back
    /// to a generic message.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorEnvelope>(body)
            .map_or_else(|_| UNKNOWN_ERROR_MESSAGE.to_string(), |envelope| envelope.error);

        match status {
            400 => Self::BadRequest(message),
            401 => Self::Unauthorized(message),
            409 => Self::Conflict(message),
            500..=599 => Self::ServerError(message),
            _ => Self::Http { status, message },
        }
    }

    /// Whether this error was raised by a 409 response.
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        let body = br#"{"error":"nope"}"#;
        assert!(matches!(ApiError::from_status(400, body), ApiError::BadRequest(m) if m == "nope"));
        assert!(matches!(ApiError::from_status(401, body), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from_status(409, body), ApiError::Conflict(_)));
        assert!(matches!(ApiError::from_status(500, body), ApiError::ServerError(_)));
        assert!(matches!(ApiError::from_status(503, body), ApiError::ServerError(_)));
        assert!(matches!(
            ApiError::from_status(404, body),
            ApiError::Http { status: 404, .. }
        ));
    }

    #[test]
    fn undecodable_error_body_uses_generic_message() {
        let error = ApiError::from_status(502, b"<html>bad gateway</html>");
        assert_eq!(error.to_string(), "Server error: Unknown error");
    }

    #[test]
    fn conflict_displays_server_message_verbatim() {
        let error = ApiError::from_status(409, br#"{"error":"Already linked"}"#);
        assert!(error.is_conflict());
        assert_eq!(error.to_string(), "Already linked");
    }
}
