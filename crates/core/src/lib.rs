//! Shared primitives for all Rust crates in relprune.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across relprune crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid or missing configuration input.
    #[error("configuration error: {0}")]
    Validation(String),

    /// Network failure or non-success HTTP status from the release host.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status code when the server answered.
        status: Option<u16>,
        /// Human readable failure detail.
        message: String,
    },

    /// Release host payload could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A bounded resource (such as the rate budget wait queue) is full.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a transport error for a non-success HTTP status.
    #[must_use]
    pub fn http_status(status: u16, status_text: &str) -> Self {
        Self::Transport {
            status: Some(status),
            message: format!("HTTP error! status: {status} - {status_text}"),
        }
    }

    /// Builds a transport error for a connection-level failure.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }
}
