use dishook_discord::{Attachment, Embed, WebhookMessage};

/// A fully assembled message, ready to hand to a transport
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePayload {
    pub sender_name: Option<String>,
    pub sender_avatar_url: Option<String>,
    pub content: Option<String>,
    pub embed: Option<Embed>,
    pub attachment: Option<Attachment>,
}

impl MessagePayload {
    /// JSON body of the webhook request. The attachment travels separately.
    pub fn to_message(&self) -> WebhookMessage {
        let mut message = WebhookMessage {
            content: self.content.clone(),
            ..Default::default()
        };
        if let Some(name) = &self.sender_name {
            message = message.with_username(name);
        }
        if let Some(avatar_url) = &self.sender_avatar_url {
            message = message.with_avatar_url(avatar_url);
        }
        if let Some(embed) = &self.embed {
            message = message.with_embed(embed.clone());
        }
        message
    }
}
