//! Discord webhook error types

use thiserror::Error;

/// Errors raised while delivering a webhook message
#[derive(Error, Debug)]
pub enum DiscordError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Invalid webhook URL: {0}")]
    InvalidWebhookUrl(String),

    #[error("Request serialization failed: {0}")]
    SerializationError(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for DiscordError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DiscordError::Timeout
        } else if err.is_builder() {
            DiscordError::InvalidWebhookUrl(err.to_string())
        } else {
            DiscordError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DiscordError {
    fn from(err: serde_json::Error) -> Self {
        DiscordError::SerializationError(err.to_string())
    }
}
