//! Error types for drafts, sends, sessions and config files

use std::path::PathBuf;
use thiserror::Error;

/// Local precondition failures, raised before anything is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Webhook URL cannot be empty")]
    MissingWebhookUrl,

    #[error("Message content exceeds {limit} characters (got {actual})")]
    ContentTooLong { limit: usize, actual: usize },

    #[error("Message cannot be empty: add content, embed data, or an attachment")]
    EmptyMessage,

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Remote call failed or returned a non-success status
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("An error occurred: {0}")]
    Transport(String),

    #[error("Failed to send message. Status code: {0}")]
    Status(u16),
}

/// Configuration and history file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration parse error in {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Failed to serialize {path}: {message}")]
    Serialize { path: PathBuf, message: String },
}

/// Errors from the background send session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A message is already being sent")]
    Busy,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Anything that can stop a one-shot compose-and-send
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
