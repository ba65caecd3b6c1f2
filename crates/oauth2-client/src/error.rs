use hyper::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::utils::{ToStringSafe, error_to_string};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a status the operation does not treat as success or absence.
    #[error("Unexpected response: [{code}] '{status_text}'", code = .status.as_u16())]
    UnexpectedResponse {
        status: StatusCode,
        status_text: String,
    },
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Network error: {0}")]
    Network(String),
    #[error("TLS error: {0}")]
    Tls(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Could not build request: {0}")]
    Request(String),
    #[error("JSON parse error: {0}")]
    Json(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub(crate) fn unexpected(status: StatusCode, reason: Option<&str>) -> Self {
        let status_text = reason
            .map(str::to_string)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_default();
        ClientError::UnexpectedResponse {
            status,
            status_text,
        }
    }

    /// HTTP status of an [`ClientError::UnexpectedResponse`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::UnexpectedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request failed below the HTTP status level (connect, TLS, timeout,
    /// malformed body).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout(_)
                | ClientError::Network(_)
                | ClientError::Tls(_)
                | ClientError::Json(_)
                | ClientError::InvalidTimestamp(_)
        )
    }
}

impl ToStringSafe for ClientError {
    fn to_string_safe(&self) -> String {
        error_to_string(self)
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
