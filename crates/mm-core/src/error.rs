//! Error types for mm-core

use thiserror::Error;

/// Core error type for Metamigrate
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// C003: Invalid or incomplete configuration value
    #[error("[C003] Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    /// C004: IO error
    #[error("[C004] IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
