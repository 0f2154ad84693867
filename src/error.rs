use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Cancellations are dropped silently and never reach the user.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Http {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
