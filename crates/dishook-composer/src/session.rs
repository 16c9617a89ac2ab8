//! Background send session
//!
//! The session owns the draft and history and is driven from a single
//! interactive thread. A send runs on a tokio task against a snapshot of the
//! draft; its result comes back over a oneshot channel and is applied when
//! the owner calls [`Session::poll`] or [`Session::wait`].

use crate::composer::{dispatch, Composer, SubmitReport};
use crate::draft::Draft;
use crate::error::{SessionError, SubmissionError};
use crate::history::WebhookHistory;
use dishook_discord::WebhookTransport;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

type SendResult = Result<SubmitReport, SubmissionError>;

struct InFlight {
    webhook_url: String,
    /// Content as it was when the send started
    content: String,
    rx: oneshot::Receiver<SendResult>,
}

pub struct Session {
    draft: Draft,
    composer: Composer,
    in_flight: Option<InFlight>,
}

impl Session {
    pub fn new(transport: Arc<dyn WebhookTransport>, history: WebhookHistory) -> Self {
        Self::with_draft(Draft::new(), transport, history)
    }

    pub fn with_draft(
        draft: Draft,
        transport: Arc<dyn WebhookTransport>,
        history: WebhookHistory,
    ) -> Self {
        Self {
            draft,
            composer: Composer::new(transport, history),
            in_flight: None,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn history(&self) -> &WebhookHistory {
        self.composer.history()
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validate the draft and start sending a snapshot of it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin_send(&mut self) -> Result<(), SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::Busy);
        }

        self.draft.validate()?;
        let payload = self.draft.build_payload();
        let webhook_url = self.draft.webhook_url.trim().to_string();
        let transport = self.composer.transport();

        let (tx, rx) = oneshot::channel();
        let url = webhook_url.clone();
        tokio::spawn(async move {
            let result = dispatch(transport.as_ref(), &url, &payload).await;
            // the receiver is gone only if the session was dropped
            let _ = tx.send(result);
        });

        debug!(webhook_url = %webhook_url, "Send started");
        self.in_flight = Some(InFlight {
            webhook_url,
            content: self.draft.content.clone(),
            rx,
        });
        Ok(())
    }

    /// Apply the result of the in-flight send if it has finished
    pub fn poll(&mut self) -> Option<SendResult> {
        let in_flight = self.in_flight.as_mut()?;
        let result = match in_flight.rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(worker_stopped()),
        };
        Some(self.complete(result))
    }

    /// Wait for the in-flight send to finish and apply its result.
    ///
    /// Returns `None` immediately when nothing is in flight. Cancel safe: if
    /// the future is dropped the send stays in flight.
    pub async fn wait(&mut self) -> Option<SendResult> {
        let in_flight = self.in_flight.as_mut()?;
        let result = (&mut in_flight.rx).await.unwrap_or_else(|_| Err(worker_stopped()));
        Some(self.complete(result))
    }

    fn complete(&mut self, result: SendResult) -> SendResult {
        let Some(in_flight) = self.in_flight.take() else {
            return result;
        };

        if let Ok(report) = &result {
            self.composer.record_outcome(&in_flight.webhook_url, report);
            // content typed while the send was running is kept
            if report.ok && self.draft.content == in_flight.content {
                self.draft.content.clear();
            }
        }
        result
    }
}

fn worker_stopped() -> SubmissionError {
    SubmissionError::Transport("send task stopped before reporting".to_string())
}
