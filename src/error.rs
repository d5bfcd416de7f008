// src/error.rs

//! Unified error handling for the lecture sync pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed or returned a non-success status
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Expected HTML structure or datetime value was missing or malformed
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    /// Published event store could not be read or written
    #[error("Storage error at {path}: {message}")]
    Storage { path: String, message: String },

    /// Calendar service rejected an event
    #[error("Publish error for '{summary}': {message}")]
    Publish { summary: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a parse error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a storage error for the given path.
    pub fn storage(path: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Storage {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a publish error for an event summary.
    pub fn publish(summary: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Publish {
            summary: summary.into(),
            message: message.to_string(),
        }
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
