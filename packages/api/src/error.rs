//! Error taxonomy for backend calls.
//!
//! Four classes, mirroring how the views react to them: authorization
//! failures force a logout, backend errors carry the server's `detail`
//! message for display, transport and decode failures fall back to a
//! generic message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the bearer token. Raising this also forces the
    /// session back to unauthenticated.
    #[error("not authenticated")]
    Unauthorized,

    /// A non-401 error response; `detail` is the backend-provided message
    /// when present, a generic fallback otherwise.
    #[error("{detail}")]
    Api { status: u16, detail: String },

    /// Transport-level failure (connection refused, DNS, TLS, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response arrived but did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A file rejected client-side before any network call.
    #[error("{0}")]
    InvalidUpload(String),
}

impl ApiError {
    /// Message suitable for direct display in a snackbar or form error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Session expired, please sign in again".to_string(),
            ApiError::Api { detail, .. } => detail.clone(),
            ApiError::Network(_) => "Could not reach the server".to_string(),
            ApiError::Decode(_) => "The server returned an unexpected response".to_string(),
            ApiError::InvalidUpload(msg) => msg.clone(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error body shape used by the backend (`{"detail": "..."}`).
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
