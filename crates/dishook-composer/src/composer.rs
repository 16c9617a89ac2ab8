//! Message submission

use crate::draft::Draft;
use crate::error::{ComposeError, SubmissionError};
use crate::history::WebhookHistory;
use crate::payload::MessagePayload;
use dishook_discord::WebhookTransport;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a completed webhook call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReport {
    pub status_code: u16,
    pub ok: bool,
}

impl SubmitReport {
    /// Discord answers 204 for plain executes and 200 with `?wait=true`
    pub fn from_status(status_code: u16) -> Self {
        Self {
            status_code,
            ok: matches!(status_code, 200 | 204),
        }
    }

    /// The failure to show the user, if any
    pub fn error(&self) -> Option<SubmissionError> {
        (!self.ok).then_some(SubmissionError::Status(self.status_code))
    }
}

/// Hand a payload to the transport and wait for the status code.
///
/// Transport failures become [`SubmissionError::Transport`]; unsuccessful
/// status codes are returned in the report.
pub async fn dispatch(
    transport: &dyn WebhookTransport,
    webhook_url: &str,
    payload: &MessagePayload,
) -> Result<SubmitReport, SubmissionError> {
    debug!(webhook_url, "Dispatching webhook message");

    let message = payload.to_message();
    let status = transport
        .execute(webhook_url, &message, payload.attachment.as_ref())
        .await
        .map_err(|e| SubmissionError::Transport(e.to_string()))?;

    Ok(SubmitReport::from_status(status))
}

/// Sends payloads and keeps the webhook history current
pub struct Composer {
    transport: Arc<dyn WebhookTransport>,
    history: WebhookHistory,
}

impl Composer {
    pub fn new(transport: Arc<dyn WebhookTransport>, history: WebhookHistory) -> Self {
        Self {
            transport,
            history,
        }
    }

    pub fn transport(&self) -> Arc<dyn WebhookTransport> {
        Arc::clone(&self.transport)
    }

    pub fn history(&self) -> &WebhookHistory {
        &self.history
    }

    /// Send `payload` to `webhook_url`, remembering the URL on success
    pub async fn submit(
        &mut self,
        webhook_url: &str,
        payload: &MessagePayload,
    ) -> Result<SubmitReport, SubmissionError> {
        let report = dispatch(self.transport.as_ref(), webhook_url, payload).await?;
        self.record_outcome(webhook_url, &report);
        Ok(report)
    }

    /// Validate, build, and submit a draft in one step
    pub async fn send(&mut self, draft: &Draft) -> Result<SubmitReport, ComposeError> {
        draft.validate()?;
        let payload = draft.build_payload();
        let webhook_url = draft.webhook_url.trim();
        Ok(self.submit(webhook_url, &payload).await?)
    }

    /// Apply the history side effect of a finished call.
    ///
    /// A history write failure is logged; the send itself already succeeded.
    pub fn record_outcome(&mut self, webhook_url: &str, report: &SubmitReport) {
        if !report.ok {
            warn!(status = report.status_code, "Webhook rejected message");
            return;
        }

        info!(status = report.status_code, "Message sent successfully");
        if let Err(e) = self.history.record(webhook_url) {
            warn!(error = %e, "Failed to save webhook history");
        }
    }
}
