// ABOUTME: Error type shared by every backend call
// Carries the HTTP status and the server's free-text detail so callers can classify failures

use thiserror::Error;

/// Marker the backend puts in `detail` when no cloud credentials are configured
pub const NOT_CONFIGURED_MARKER: &str = "not configured";

/// Status the backend answers with when the provisioning service is offline
pub const SERVICE_UNAVAILABLE: u16 = 503;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("backend responded {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(status: u16, detail: Option<String>) -> Self {
        Self::Status { status, detail }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided detail, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref().filter(|d| !d.is_empty()),
            _ => None,
        }
    }

    /// 503, or a detail mentioning "not configured"
    pub fn is_backend_unavailable(&self) -> bool {
        self.status_code() == Some(SERVICE_UNAVAILABLE)
            || self
                .detail()
                .is_some_and(|d| d.contains(NOT_CONFIGURED_MARKER))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
