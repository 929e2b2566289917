//! Error types for the notelace client engine.

use thiserror::Error;

/// Result type alias using notelace's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notelace operations.
///
/// Every failure a component reports is one of these classifications.
/// Nothing here is fatal: callers recover at the component boundary and
/// the local state is always left in a previously-valid configuration.
/// No variant is ever retried automatically; retries are user-initiated.
#[derive(Error, Debug)]
pub enum Error {
    /// Bearer credential rejected (HTTP 401). The user must re-authenticate.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Authenticated but not authorized (HTTP 403). Never retried.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource gone (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected by server-side validation (4xx with detail text)
    #[error("Validation rejected: {0}")]
    Validation(String),

    /// Transport-level failure with no HTTP status
    #[error("Network error: {0}")]
    Network(String),

    /// 2xx response that could not be parsed or failed field validation
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Server-side failure (5xx)
    #[error("Server error: {0}")]
    Server(String),

    /// Rejected locally before any request was issued
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Classify an HTTP error status into the notelace taxonomy.
    ///
    /// `detail` is the server-provided message when the body carried one
    /// (the API uses `{"detail": "..."}` bodies). An absent detail is
    /// stored as an empty string; `user_message` falls back to the
    /// caller's operation-specific string in that case.
    pub fn from_status(status: u16, detail: Option<&str>) -> Self {
        let msg = detail.unwrap_or_default().to_string();
        match status {
            401 => Self::SessionExpired(msg),
            403 => Self::Forbidden(msg),
            404 => Self::NotFound(msg),
            400..=499 => Self::Validation(msg),
            _ => Self::Server(msg),
        }
    }

    /// Whether this failure means the session credential is no longer
    /// valid and the caller should redirect to re-authentication.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }

    /// User-displayable message for this failure.
    ///
    /// Session expiry and permission denial have fixed phrasings so the
    /// UI can rely on them. Other classified responses surface the
    /// server-provided detail verbatim when one was present, else the
    /// operation-specific string supplied by the caller. Transport and
    /// parse failures always use the fallback (their internals are not
    /// user-displayable).
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::SessionExpired(_) => "Session expired. Please log in again.".to_string(),
            Self::Forbidden(_) => "Permission denied.".to_string(),
            Self::Validation(detail) | Self::NotFound(detail) | Self::Server(detail)
            | Self::InvalidInput(detail) => {
                if detail.is_empty() {
                    fallback.to_string()
                } else {
                    detail.clone()
                }
            }
            Self::Network(_) | Self::MalformedResponse(_) => fallback.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedResponse(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e.to_string())
    }
}
