// src/error.rs

//! Unified error handling for the library.
//!
//! Remote failures carried here are recoverable by design: the source
//! router catches them and falls back to the bundled corpus, so none of
//! these variants cross the public read API. "Not found" is represented as
//! `None`/empty results, never as an error.

use std::fmt;

use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote source returned an unusable response
    #[error("Remote error for {context}: {message}")]
    Remote { context: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a remote error with context.
    pub fn remote(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Remote {
            context: context.into(),
            message: message.to_string(),
        }
    }
}
