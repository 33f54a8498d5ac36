use thiserror::Error;

/// Typed outcome classification for collaborator API calls.
///
/// Classification happens here and in the HTTP adapter, from status codes.
/// Callers branch on variants; nobody matches on message substrings.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    #[error("resource already exists")]
    Conflict,

    #[error("no verification grant; authorize at {auth_url} and store the token")]
    Unauthorized { auth_url: String },

    #[error("upstream API failure ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid request or response body: {0}")]
    Body(#[from] serde_json::Error),
}

impl ApiError {
    /// Transient failures worth another attempt: network errors, 5xx and
    /// rate limiting. Not-found/conflict are answers, not failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Upstream { status, .. } => *status >= 500 || *status == 429,
            ApiError::NotFound
            | ApiError::Conflict
            | ApiError::Unauthorized { .. }
            | ApiError::Body(_) => false,
        }
    }
}
