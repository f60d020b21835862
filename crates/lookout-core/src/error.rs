//! Error types for the Lookout relay.
//!
//! Only configuration and start-up failures ever leave the crate as errors.
//! Everything that can go wrong while serving a request is a [`ModelError`],
//! which the relay renders into its `"Error: ..."` reply text.

use thiserror::Error;

/// Top-level error type for Lookout operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Upstream model errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// General I/O errors (binding the listener, serving)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures while turning a request into a model answer.
///
/// The `Display` text is exactly what follows `"Error: "` in the reply sent
/// back to the caller.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The screenshot payload is not valid base64
    #[error("Invalid base64 encoding - {0}")]
    InvalidImage(#[from] base64::DecodeError),

    /// The HTTP exchange with the upstream endpoint failed
    #[error("{message}")]
    Request { message: String },

    /// The upstream body was not the expected chat-completion JSON
    #[error("Invalid model response: {message}")]
    Parse { message: String },

    /// The upstream answered without any completion choices
    #[error("No valid response from model.")]
    NoChoices,
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::Request {
            message: error_chain(&err),
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Parse {
            message: err.to_string(),
        }
    }
}

/// Render an error and all of its sources as one `a: b: c` line.
///
/// reqwest keeps the interesting part ("Connection refused", "operation timed
/// out") in the source chain, not in the top-level message.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

/// Convenience type alias for Lookout results.
pub type Result<T> = std::result::Result<T, RelayError>;
