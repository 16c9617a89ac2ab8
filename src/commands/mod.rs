pub mod history;
pub mod interactive;
pub mod send;

use anyhow::{anyhow, Context, Result};
use dishook_composer::AppConfig;
use dishook_discord::{Attachment, ReqwestTransport, WebhookTransport};
use std::path::Path;
use std::sync::Arc;

/// Read a file into an attachment named after the file
pub async fn load_attachment(path: &Path) -> Result<Attachment> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Attachment path has no file name: {}", path.display()))?
        .to_string();

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read attachment: {}", path.display()))?;

    Ok(Attachment::new(filename, bytes))
}

/// Build the HTTP transport described by the config
pub fn build_transport(config: &AppConfig, dry_run: bool) -> Result<Arc<dyn WebhookTransport>> {
    let mut transport_config = config.transport_config();
    transport_config.dry_run |= dry_run;

    let transport = ReqwestTransport::with_config(transport_config)
        .context("Failed to create HTTP client")?;
    Ok(Arc::new(transport))
}

/// Split `NAME=VALUE` into its parts
pub fn parse_name_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", input)),
    }
}
