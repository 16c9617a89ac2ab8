//! Discord webhook HTTP transport

use crate::error::DiscordError;
use crate::types::{Attachment, WebhookMessage};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Status reported for dry-run deliveries
const DRY_RUN_STATUS: u16 = 204;

/// Delivers a webhook message and reports the HTTP status code.
///
/// Non-success status codes are returned as `Ok`; only failures to complete
/// the request at all are errors.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn execute(
        &self,
        webhook_url: &str,
        message: &WebhookMessage,
        attachment: Option<&Attachment>,
    ) -> Result<u16, DiscordError>;
}

/// Configuration for the webhook transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// HTTP request timeout
    pub timeout: Duration,

    /// Whether to run in dry-run mode (no actual requests)
    pub dry_run: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            dry_run: false,
        }
    }
}

/// Webhook transport backed by `reqwest`
pub struct ReqwestTransport {
    client: Client,
    dry_run: AtomicBool,
}

impl ReqwestTransport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self, DiscordError> {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: TransportConfig) -> Result<Self, DiscordError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DiscordError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            dry_run: AtomicBool::new(config.dry_run),
        })
    }

    /// Set dry-run mode
    pub fn set_dry_run(&self, dry_run: bool) {
        self.dry_run.store(dry_run, Ordering::SeqCst);
    }

    /// Check if in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run.load(Ordering::SeqCst)
    }
}

fn parse_webhook_url(webhook_url: &str) -> Result<Url, DiscordError> {
    let url = Url::parse(webhook_url)
        .map_err(|e| DiscordError::InvalidWebhookUrl(format!("{}: {}", webhook_url, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DiscordError::InvalidWebhookUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

/// Build the multipart body Discord expects for uploads: the message as
/// `payload_json` plus the file as `files[0]`.
fn multipart_form(message: &WebhookMessage, attachment: &Attachment) -> Result<Form, DiscordError> {
    let payload_json = serde_json::to_string(message)?;
    let file = Part::bytes(attachment.bytes.clone()).file_name(attachment.filename.clone());

    Ok(Form::new()
        .text("payload_json", payload_json)
        .part("files[0]", file))
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn execute(
        &self,
        webhook_url: &str,
        message: &WebhookMessage,
        attachment: Option<&Attachment>,
    ) -> Result<u16, DiscordError> {
        let url = parse_webhook_url(webhook_url)?;

        if self.is_dry_run() {
            let json = serde_json::to_string_pretty(message)?;
            info!(
                webhook_url = %url,
                attachment = ?attachment.map(|a| a.filename.as_str()),
                "[DRY RUN] Would send Discord message:\n{}",
                json
            );
            return Ok(DRY_RUN_STATUS);
        }

        debug!(
            webhook_url = %url,
            multipart = attachment.is_some(),
            "Sending Discord webhook message"
        );

        let request = self.client.post(url);
        let request = match attachment {
            Some(attachment) => request.multipart(multipart_form(message, attachment)?),
            None => request.json(message),
        };

        let response = request.send().await?;
        let status = response.status().as_u16();

        debug!(status, "Discord webhook responded");
        Ok(status)
    }
}
