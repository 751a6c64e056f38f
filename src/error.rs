// Error types
//
// InputError is the only failure a caller ever sees. Provider failures are
// recovered by the local generator and credential errors only surface on
// the `key` CLI commands.

use http::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Rejections of a request body before any synthesis runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("Content type must be application/json")]
    UnsupportedContentType,

    #[error("Missing required field: prompt")]
    MissingPrompt,

    #[error("Field prompt must be a string")]
    PromptNotString,

    #[error("Prompt is too long ({actual} characters, limit {max})")]
    PromptTooLong { max: usize, actual: usize },

    #[error("Field mode must be \"auto\" or \"local\"")]
    InvalidMode,

    #[error("Request body rejected: {reason}")]
    BodyRejected { status: u16, reason: String },
}

impl InputError {
    /// HTTP status reported for this rejection
    pub fn status(&self) -> StatusCode {
        match self {
            InputError::MalformedBody(_)
            | InputError::MissingPrompt
            | InputError::PromptNotString
            | InputError::InvalidMode => StatusCode::BAD_REQUEST,
            InputError::UnsupportedContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            InputError::PromptTooLong { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            InputError::BodyRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
        }
    }
}

/// Why a completion provider produced nothing usable
#[derive(Debug, Error)]
pub enum ProviderFailure {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider error: {0}")]
    Error(String),
}

/// Keychain failures for the stored Anthropic API key
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Invalid API key format: {0}")]
    InvalidFormat(&'static str),

    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),
}
