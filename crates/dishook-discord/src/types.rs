//! Discord webhook types for message formatting

use serde::Serialize;

/// Discord webhook message payload
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct WebhookMessage {
    /// Plain text content (up to 2000 characters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Username to display for this message (overrides webhook default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Avatar URL to display for this message (overrides webhook default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// Rich embeds
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl WebhookMessage {
    /// Create a new message with plain text content
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Add an embed to the message
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Set the username for this message
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the avatar URL for this message
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }
}

/// Discord embed for rich message formatting
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct Embed {
    /// Embed title (up to 256 characters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Embed description (up to 4096 characters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// URL for the title to link to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Embed color as a 24-bit integer
    pub color: u32,

    /// RFC 3339 timestamp shown next to the footer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedImage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,

    /// Fields (up to 25)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

/// Discord embed field
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedField {
    /// Field name (up to 256 characters)
    pub name: String,

    /// Field value (up to 1024 characters)
    pub value: String,

    /// Whether this field should be displayed inline
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Discord embed footer
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedFooter {
    /// Footer text (up to 2048 characters)
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Discord embed image or thumbnail
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedImage {
    pub url: String,
}

/// Discord embed author
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedAuthor {
    /// Author name (up to 256 characters)
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// A single file uploaded alongside a message
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Embed colors and hex color parsing
pub mod colors {
    /// Blurple (Discord brand color), used when no valid color is given
    pub const DEFAULT: u32 = 0x5865F2;

    /// Parse a `RRGGBB` hex color, with or without a leading `#`.
    ///
    /// Only exactly six hex digits are accepted.
    pub fn parse_hex(input: &str) -> Option<u32> {
        let hex = input.strip_prefix('#').unwrap_or(input);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok()
    }

    /// Parse a hex color, substituting [`DEFAULT`] when it is not valid
    pub fn parse_or_default(input: &str) -> u32 {
        parse_hex(input).unwrap_or(DEFAULT)
    }
}
