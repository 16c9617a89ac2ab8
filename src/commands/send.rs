//! One-shot send command

use super::{build_transport, load_attachment, parse_name_value};
use anyhow::{bail, Result};
use clap::Args;
use dishook_composer::{AppConfig, Composer, Draft, DraftField, WebhookHistory};
use std::path::PathBuf;

/// Compose a message from flags and send it
#[derive(Debug, Args)]
pub struct SendCommand {
    /// Webhook URL (defaults to the most recently used one)
    #[arg(long, short)]
    pub webhook: Option<String>,

    /// Bot name override
    #[arg(long)]
    pub username: Option<String>,

    /// Bot avatar override
    #[arg(long)]
    pub avatar_url: Option<String>,

    /// Plain message text
    #[arg(long, short)]
    pub content: Option<String>,

    /// Embed title
    #[arg(long)]
    pub title: Option<String>,

    /// Link for the embed title
    #[arg(long)]
    pub url: Option<String>,

    /// Embed color as RRGGBB hex, with or without '#'
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub author_name: Option<String>,

    #[arg(long)]
    pub author_url: Option<String>,

    #[arg(long)]
    pub author_icon: Option<String>,

    #[arg(long)]
    pub footer_text: Option<String>,

    #[arg(long)]
    pub footer_icon: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,

    #[arg(long)]
    pub thumbnail_url: Option<String>,

    /// Stamp the embed with the current time
    #[arg(long)]
    pub timestamp: bool,

    /// Embed field as NAME=VALUE (repeatable)
    #[arg(long = "field", value_parser = parse_name_value)]
    pub fields: Vec<(String, String)>,

    /// Inline embed field as NAME=VALUE (repeatable)
    #[arg(long = "inline-field", value_parser = parse_name_value)]
    pub inline_fields: Vec<(String, String)>,

    /// File to attach
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Log the message instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl SendCommand {
    /// Apply the flags on top of `draft`
    pub fn fill_draft(&self, draft: &mut Draft) {
        let text_flags = [
            (DraftField::Username, &self.username),
            (DraftField::AvatarUrl, &self.avatar_url),
            (DraftField::Content, &self.content),
            (DraftField::Title, &self.title),
            (DraftField::Url, &self.url),
            (DraftField::Color, &self.color),
            (DraftField::Description, &self.description),
            (DraftField::AuthorName, &self.author_name),
            (DraftField::AuthorUrl, &self.author_url),
            (DraftField::AuthorIcon, &self.author_icon),
            (DraftField::FooterText, &self.footer_text),
            (DraftField::FooterIcon, &self.footer_icon),
            (DraftField::ImageUrl, &self.image_url),
            (DraftField::ThumbnailUrl, &self.thumbnail_url),
        ];
        for (field, value) in text_flags {
            if let Some(value) = value {
                draft.set_field(field, value.trim());
            }
        }

        draft.set_timestamp(self.timestamp);
        for (name, value) in &self.fields {
            draft.add_field(name.as_str(), value.as_str(), false);
        }
        for (name, value) in &self.inline_fields {
            draft.add_field(name.as_str(), value.as_str(), true);
        }
    }

    pub async fn run(&self, config: &AppConfig) -> Result<()> {
        let history = WebhookHistory::load(&config.history_path);

        let mut draft = config.new_draft();
        if let Some(webhook_url) = self.webhook.as_deref().or(history.latest()) {
            draft.set_field(DraftField::WebhookUrl, webhook_url);
        }
        self.fill_draft(&mut draft);
        if let Some(path) = &self.file {
            draft.set_attachment(Some(load_attachment(path).await?));
        }

        let transport = build_transport(config, self.dry_run)?;
        let mut composer = Composer::new(transport, history);

        let report = composer.send(&draft).await?;
        if let Some(error) = report.error() {
            bail!(error);
        }

        println!("Message sent successfully! (status {})", report.status_code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        send: SendCommand,
    }

    fn parse(args: &[&str]) -> SendCommand {
        let mut argv = vec!["dishook"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv).send
    }

    #[test]
    fn test_flags_fill_draft() {
        let command = parse(&[
            "--webhook",
            "https://example/webhook",
            "--content",
            "hello",
            "--title",
            "Deploy",
            "--color",
            " #57F287 ",
            "--field",
            "Env=prod",
            "--inline-field",
            "Region=eu",
            "--timestamp",
        ]);

        let mut draft = Draft::new();
        command.fill_draft(&mut draft);

        assert_eq!(draft.content, "hello");
        assert_eq!(draft.embed.title, "Deploy");
        assert_eq!(draft.embed.color, "#57F287");
        assert!(draft.embed.timestamp);
        assert_eq!(draft.fields().len(), 2);
        assert!(!draft.fields()[0].inline);
        assert_eq!(draft.fields()[1].name, "Region");
        assert!(draft.fields()[1].inline);
    }

    #[test]
    fn test_flags_keep_configured_identity() {
        let command = parse(&["--content", "hi"]);
        let mut draft = Draft::new();
        draft.set_field(DraftField::Username, "Configured");
        command.fill_draft(&mut draft);
        assert_eq!(draft.username, "Configured");
    }

    #[test]
    fn test_bad_field_flag_rejected() {
        let result = Cli::try_parse_from(["dishook", "--field", "novalue"]);
        assert!(result.is_err());
    }
}
