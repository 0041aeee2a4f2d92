//! Error types for wattwise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("No API credential configured")]
    MissingCredential,
}

pub type Result<T> = std::result::Result<T, Error>;
