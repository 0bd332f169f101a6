use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    Transport,
    HttpStatus,
    InvalidResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server responded with HTTP status {0}")]
    HttpStatus(u16),
    #[error("invalid response body: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Timeout => ErrorKind::Timeout,
            FetchError::Transport(_) => ErrorKind::Transport,
            FetchError::HttpStatus(_) => ErrorKind::HttpStatus,
            FetchError::InvalidResponse(_) => ErrorKind::InvalidResponse,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::HttpStatus(404))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        FetchError::InvalidResponse(value.to_string())
    }
}
