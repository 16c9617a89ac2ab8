//! Discord webhook wire types and HTTP transport for dishook

mod client;
mod error;
mod types;

pub use client::{ReqwestTransport, TransportConfig, WebhookTransport};
pub use error::DiscordError;
pub use types::{
    colors, Attachment, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedImage, WebhookMessage,
};
