//! Error types for mm-api

use thiserror::Error;

/// Transport-level errors from the analytics server
#[derive(Error, Debug)]
pub enum ApiError {
    /// A001: Session authentication rejected
    #[error("[A001] Authentication failed for {username} at {base_url}")]
    AuthFailed { username: String, base_url: String },

    /// A002: Server returned a non-success status
    #[error("[A002] {method} {url} returned {status}: {body}")]
    Request {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    /// A003: Connection-level failure
    #[error("[A003] Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A004: Response body did not match the expected shape
    #[error("[A004] Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Result type alias for ApiError
pub type ApiResult<T> = Result<T, ApiError>;
