//! In-memory message draft
//!
//! A [`Draft`] is plain data: it is mutated by the owning thread through the
//! setters below and cloned as a snapshot when a send starts.

use crate::error::ValidationError;
use crate::payload::MessagePayload;
use chrono::{DateTime, SecondsFormat, Utc};
use dishook_discord::{colors, Attachment, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedImage};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Discord's limit on plain message content
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Text fields of a draft that can be set by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    WebhookUrl,
    Username,
    AvatarUrl,
    Content,
    Title,
    Url,
    Color,
    Description,
    AuthorName,
    AuthorUrl,
    AuthorIcon,
    FooterText,
    FooterIcon,
    ImageUrl,
    ThumbnailUrl,
}

impl DraftField {
    pub const ALL: [DraftField; 15] = [
        DraftField::WebhookUrl,
        DraftField::Username,
        DraftField::AvatarUrl,
        DraftField::Content,
        DraftField::Title,
        DraftField::Url,
        DraftField::Color,
        DraftField::Description,
        DraftField::AuthorName,
        DraftField::AuthorUrl,
        DraftField::AuthorIcon,
        DraftField::FooterText,
        DraftField::FooterIcon,
        DraftField::ImageUrl,
        DraftField::ThumbnailUrl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::WebhookUrl => "webhook-url",
            DraftField::Username => "username",
            DraftField::AvatarUrl => "avatar-url",
            DraftField::Content => "content",
            DraftField::Title => "title",
            DraftField::Url => "url",
            DraftField::Color => "color",
            DraftField::Description => "description",
            DraftField::AuthorName => "author-name",
            DraftField::AuthorUrl => "author-url",
            DraftField::AuthorIcon => "author-icon",
            DraftField::FooterText => "footer-text",
            DraftField::FooterIcon => "footer-icon",
            DraftField::ImageUrl => "image-url",
            DraftField::ThumbnailUrl => "thumbnail-url",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        DraftField::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// Stable identifier of an embed field row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u64);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(FieldId)
    }
}

/// One name/value row of the embed field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub id: FieldId,
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl FieldRow {
    /// Rows with a blank name or value are dropped from the embed
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.value.trim().is_empty()
    }
}

/// Embed portion of a draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedDraft {
    pub title: String,
    pub url: String,
    pub description: String,
    pub color: String,
    pub author_name: String,
    pub author_url: String,
    pub author_icon_url: String,
    pub footer_text: String,
    pub footer_icon_url: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub timestamp: bool,
    fields: Vec<FieldRow>,
}

impl EmbedDraft {
    /// Ordered field rows, including incomplete ones
    pub fn fields(&self) -> &[FieldRow] {
        &self.fields
    }

    /// Whether anything here would render in Discord.
    ///
    /// Color and timestamp alone do not make an embed.
    pub fn has_data(&self) -> bool {
        [
            &self.title,
            &self.description,
            &self.url,
            &self.author_name,
            &self.footer_text,
            &self.image_url,
            &self.thumbnail_url,
        ]
        .into_iter()
        .any(|value| !value.trim().is_empty())
            || self.fields.iter().any(FieldRow::is_complete)
    }

    /// Build the wire embed, or `None` when there is nothing to show
    pub fn build(&self, now: DateTime<Utc>) -> Option<Embed> {
        if !self.has_data() {
            return None;
        }

        let author = non_blank(&self.author_name).map(|name| EmbedAuthor {
            name,
            url: non_blank(&self.author_url),
            icon_url: non_blank(&self.author_icon_url),
        });

        let footer = non_blank(&self.footer_text).map(|text| EmbedFooter {
            text,
            icon_url: non_blank(&self.footer_icon_url),
        });

        let fields = self
            .fields
            .iter()
            .filter(|row| row.is_complete())
            .map(|row| EmbedField::new(row.name.trim(), row.value.trim(), row.inline))
            .collect();

        let color = colors::parse_hex(&self.color).unwrap_or_else(|| {
            if !self.color.trim().is_empty() {
                debug!(color = %self.color, "Invalid embed color, using default");
            }
            colors::DEFAULT
        });

        Some(Embed {
            title: non_blank(&self.title),
            description: non_blank(&self.description),
            url: non_blank(&self.url),
            color,
            timestamp: self
                .timestamp
                .then(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            footer,
            thumbnail: non_blank(&self.thumbnail_url).map(|url| EmbedImage { url }),
            image: non_blank(&self.image_url).map(|url| EmbedImage { url }),
            author,
            fields,
        })
    }
}

/// A message being composed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub webhook_url: String,
    pub username: String,
    pub avatar_url: String,
    pub content: String,
    pub embed: EmbedDraft,
    pub attachment: Option<Attachment>,
    next_field_id: u64,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update a text field. No validation happens until submission.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    /// Current value of a text field
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::WebhookUrl => &self.webhook_url,
            DraftField::Username => &self.username,
            DraftField::AvatarUrl => &self.avatar_url,
            DraftField::Content => &self.content,
            DraftField::Title => &self.embed.title,
            DraftField::Url => &self.embed.url,
            DraftField::Color => &self.embed.color,
            DraftField::Description => &self.embed.description,
            DraftField::AuthorName => &self.embed.author_name,
            DraftField::AuthorUrl => &self.embed.author_url,
            DraftField::AuthorIcon => &self.embed.author_icon_url,
            DraftField::FooterText => &self.embed.footer_text,
            DraftField::FooterIcon => &self.embed.footer_icon_url,
            DraftField::ImageUrl => &self.embed.image_url,
            DraftField::ThumbnailUrl => &self.embed.thumbnail_url,
        }
    }

    fn slot_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::WebhookUrl => &mut self.webhook_url,
            DraftField::Username => &mut self.username,
            DraftField::AvatarUrl => &mut self.avatar_url,
            DraftField::Content => &mut self.content,
            DraftField::Title => &mut self.embed.title,
            DraftField::Url => &mut self.embed.url,
            DraftField::Color => &mut self.embed.color,
            DraftField::Description => &mut self.embed.description,
            DraftField::AuthorName => &mut self.embed.author_name,
            DraftField::AuthorUrl => &mut self.embed.author_url,
            DraftField::AuthorIcon => &mut self.embed.author_icon_url,
            DraftField::FooterText => &mut self.embed.footer_text,
            DraftField::FooterIcon => &mut self.embed.footer_icon_url,
            DraftField::ImageUrl => &mut self.embed.image_url,
            DraftField::ThumbnailUrl => &mut self.embed.thumbnail_url,
        }
    }

    pub fn set_timestamp(&mut self, enabled: bool) {
        self.embed.timestamp = enabled;
    }

    pub fn set_attachment(&mut self, attachment: Option<Attachment>) {
        self.attachment = attachment;
    }

    /// Append an embed field row and return its id
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> FieldId {
        let id = FieldId(self.next_field_id);
        self.next_field_id += 1;
        self.embed.fields.push(FieldRow {
            id,
            name: name.into(),
            value: value.into(),
            inline,
        });
        id
    }

    /// Remove the row with this id. Returns false if there was none.
    pub fn remove_field(&mut self, id: FieldId) -> bool {
        match self.embed.fields.iter().position(|row| row.id == id) {
            Some(index) => {
                self.embed.fields.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the contents of an existing row. Returns false if there was none.
    pub fn update_field(
        &mut self,
        id: FieldId,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> bool {
        match self.embed.fields.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.name = name.into();
                row.value = value.into();
                row.inline = inline;
                true
            }
            None => false,
        }
    }

    pub fn fields(&self) -> &[FieldRow] {
        self.embed.fields()
    }

    /// Reset message and embed data, keeping the webhook URL and identity
    pub fn clear(&mut self) {
        self.content.clear();
        self.embed = EmbedDraft::default();
        self.attachment = None;
    }

    /// Check local preconditions before sending
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.webhook_url.trim().is_empty() {
            return Err(ValidationError::MissingWebhookUrl);
        }

        let content = self.content.trim();
        let length = content.chars().count();
        if length > MAX_CONTENT_CHARS {
            return Err(ValidationError::ContentTooLong {
                limit: MAX_CONTENT_CHARS,
                actual: length,
            });
        }

        if content.is_empty() && !self.embed.has_data() && self.attachment.is_none() {
            return Err(ValidationError::EmptyMessage);
        }

        Ok(())
    }

    /// Assemble the payload using the current time for embed timestamps
    pub fn build_payload(&self) -> MessagePayload {
        self.build_payload_at(Utc::now())
    }

    pub fn build_payload_at(&self, now: DateTime<Utc>) -> MessagePayload {
        MessagePayload {
            sender_name: non_blank(&self.username),
            sender_avatar_url: non_blank(&self.avatar_url),
            content: non_blank(&self.content),
            embed: self.embed.build(now),
            attachment: self.attachment.clone(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const WEBHOOK: &str = "https://example/webhook";

    fn draft_with_url() -> Draft {
        let mut draft = Draft::new();
        draft.set_field(DraftField::WebhookUrl, WEBHOOK);
        draft
    }

    #[test]
    fn test_draft_field_names_round_trip() {
        for field in DraftField::ALL {
            assert_eq!(field.as_str().parse::<DraftField>().unwrap(), field);
        }
        assert_eq!("Footer_Text".parse::<DraftField>().unwrap(), DraftField::FooterText);
        assert!(matches!(
            "colour".parse::<DraftField>(),
            Err(ValidationError::UnknownField(_))
        ));
    }

    #[test]
    fn test_set_field_updates_matching_slot() {
        let mut draft = Draft::new();
        for (i, field) in DraftField::ALL.into_iter().enumerate() {
            draft.set_field(field, format!("value-{i}"));
        }
        for (i, field) in DraftField::ALL.into_iter().enumerate() {
            assert_eq!(draft.field(field), format!("value-{i}"));
        }
    }

    #[test]
    fn test_validate_requires_webhook_url() {
        let mut draft = Draft::new();
        draft.set_field(DraftField::Content, "hello");
        assert_eq!(draft.validate(), Err(ValidationError::MissingWebhookUrl));

        draft.set_field(DraftField::WebhookUrl, "   ");
        assert_eq!(draft.validate(), Err(ValidationError::MissingWebhookUrl));
    }

    #[test]
    fn test_validate_empty_message() {
        let mut draft = draft_with_url();
        assert_eq!(draft.validate(), Err(ValidationError::EmptyMessage));

        // color and timestamp alone are not embed data
        draft.set_field(DraftField::Color, "#FF0000");
        draft.set_timestamp(true);
        draft.add_field("name only", "", false);
        assert_eq!(draft.validate(), Err(ValidationError::EmptyMessage));
    }

    #[test]
    fn test_validate_accepts_any_single_source() {
        let mut content = draft_with_url();
        content.set_field(DraftField::Content, "hello");
        assert!(content.validate().is_ok());

        let mut embed = draft_with_url();
        embed.set_field(DraftField::Title, "Title");
        assert!(embed.validate().is_ok());

        let mut field = draft_with_url();
        field.add_field("Name", "Value", true);
        assert!(field.validate().is_ok());

        let mut attachment = draft_with_url();
        attachment.set_attachment(Some(Attachment::new("a.txt", b"a".to_vec())));
        assert!(attachment.validate().is_ok());
    }

    #[test]
    fn test_content_length_boundary() {
        let mut draft = draft_with_url();
        draft.set_field(DraftField::Content, "a".repeat(MAX_CONTENT_CHARS));
        assert!(draft.validate().is_ok());

        draft.set_field(DraftField::Content, "a".repeat(MAX_CONTENT_CHARS + 1));
        assert_eq!(
            draft.validate(),
            Err(ValidationError::ContentTooLong {
                limit: MAX_CONTENT_CHARS,
                actual: MAX_CONTENT_CHARS + 1,
            })
        );
    }

    #[test]
    fn test_content_length_counts_characters_not_bytes() {
        let mut draft = draft_with_url();
        draft.set_field(DraftField::Content, "é".repeat(MAX_CONTENT_CHARS));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_remove_field_removes_only_that_row() {
        let mut draft = Draft::new();
        let a = draft.add_field("a", "1", false);
        let b = draft.add_field("b", "2", true);
        let c = draft.add_field("c", "3", false);

        assert!(draft.remove_field(b));
        let ids: Vec<FieldId> = draft.fields().iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(draft.fields()[1].name, "c");

        assert!(!draft.remove_field(b));
        assert_eq!(draft.fields().len(), 2);
    }

    #[test]
    fn test_add_then_remove_all_fields() {
        let mut draft = Draft::new();
        let ids: Vec<FieldId> = (0..7)
            .map(|i| draft.add_field(format!("n{i}"), format!("v{i}"), i % 2 == 0))
            .collect();
        assert_eq!(draft.fields().len(), 7);

        for id in ids {
            assert!(draft.remove_field(id));
        }
        assert!(draft.fields().is_empty());
    }

    #[test]
    fn test_field_ids_are_not_reused() {
        let mut draft = Draft::new();
        let first = draft.add_field("a", "1", false);
        draft.remove_field(first);
        let second = draft.add_field("b", "2", false);
        assert_ne!(first, second);
    }

    #[test]
    fn test_update_field() {
        let mut draft = Draft::new();
        let id = draft.add_field("a", "1", false);
        assert!(draft.update_field(id, "b", "2", true));
        assert_eq!(draft.fields()[0].name, "b");
        assert!(draft.fields()[0].inline);

        assert!(!draft.update_field("99".parse().unwrap(), "x", "y", false));
    }

    #[test]
    fn test_build_payload_plain_text() {
        let mut draft = draft_with_url();
        draft.set_field(DraftField::Content, "  hello \n");
        draft.set_field(DraftField::Username, "Hook Bot");

        let payload = draft.build_payload();
        assert_eq!(payload.content.as_deref(), Some("hello"));
        assert_eq!(payload.sender_name.as_deref(), Some("Hook Bot"));
        assert!(payload.sender_avatar_url.is_none());
        assert!(payload.embed.is_none());
        assert!(payload.attachment.is_none());
    }

    #[test]
    fn test_build_payload_skips_incomplete_sub_objects() {
        let mut draft = draft_with_url();
        draft.set_field(DraftField::Title, "Deploy");
        draft.set_field(DraftField::AuthorUrl, "https://example.com");
        draft.set_field(DraftField::FooterIcon, "https://example.com/icon.png");
        draft.set_field(DraftField::ImageUrl, " ");
        draft.add_field("Env", "prod", true);
        draft.add_field("", "orphan value", false);
        draft.add_field("orphan name", "", false);

        let embed = draft.build_payload().embed.unwrap();
        assert_eq!(embed.title.as_deref(), Some("Deploy"));
        assert!(embed.author.is_none());
        assert!(embed.footer.is_none());
        assert!(embed.image.is_none());
        assert_eq!(embed.fields, vec![EmbedField::new("Env", "prod", true)]);
        assert_eq!(embed.color, colors::DEFAULT);
        assert!(embed.timestamp.is_none());
    }

    #[test]
    fn test_build_payload_full_embed() {
        let mut draft = draft_with_url();
        draft.set_field(DraftField::Color, "#57F287");
        draft.set_field(DraftField::AuthorName, "Ops");
        draft.set_field(DraftField::AuthorIcon, "https://example.com/ops.png");
        draft.set_field(DraftField::FooterText, "footer");
        draft.set_field(DraftField::ThumbnailUrl, "https://example.com/t.png");
        draft.set_timestamp(true);

        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let embed = draft.build_payload_at(now).embed.unwrap();

        assert_eq!(embed.color, 0x57F287);
        let author = embed.author.unwrap();
        assert_eq!(author.name, "Ops");
        assert!(author.url.is_none());
        assert_eq!(author.icon_url.as_deref(), Some("https://example.com/ops.png"));
        assert_eq!(embed.footer.unwrap().text, "footer");
        assert_eq!(embed.thumbnail.unwrap().url, "https://example.com/t.png");
        assert_eq!(embed.timestamp.as_deref(), Some("2024-01-15T12:00:00.000Z"));
    }

    #[test]
    fn test_invalid_color_uses_default() {
        let mut draft = draft_with_url();
        draft.set_field(DraftField::Title, "t");
        draft.set_field(DraftField::Color, "purple");
        assert_eq!(draft.build_payload().embed.unwrap().color, colors::DEFAULT);
    }

    #[test]
    fn test_clear_keeps_destination_and_identity() {
        let mut draft = draft_with_url();
        draft.set_field(DraftField::Username, "Bot");
        draft.set_field(DraftField::Content, "hello");
        draft.set_field(DraftField::Title, "title");
        draft.add_field("a", "b", false);
        draft.set_attachment(Some(Attachment::new("a.txt", b"a".to_vec())));

        draft.clear();
        assert_eq!(draft.webhook_url, WEBHOOK);
        assert_eq!(draft.username, "Bot");
        assert!(draft.content.is_empty());
        assert!(draft.fields().is_empty());
        assert!(draft.attachment.is_none());
        assert!(!draft.embed.has_data());
    }
}
