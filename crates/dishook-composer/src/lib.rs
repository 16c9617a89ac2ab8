//! dishook composer
//!
//! Draft state, validation, payload assembly, submission, webhook history,
//! and the background send session.

pub mod composer;
pub mod config;
pub mod draft;
pub mod error;
pub mod history;
pub mod payload;
pub mod session;

pub use composer::{dispatch, Composer, SubmitReport};
pub use config::AppConfig;
pub use draft::{Draft, DraftField, EmbedDraft, FieldId, FieldRow, MAX_CONTENT_CHARS};
pub use error::{ComposeError, ConfigError, SessionError, SubmissionError, ValidationError};
pub use history::{WebhookHistory, MAX_HISTORY};
pub use payload::MessagePayload;
pub use session::Session;
