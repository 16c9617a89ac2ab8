//! Webhook history command

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use dishook_composer::{AppConfig, WebhookHistory};

/// Inspect or edit the list of recently used webhooks
#[derive(Debug, Args)]
pub struct HistoryCommand {
    #[command(subcommand)]
    pub command: HistorySubcommand,
}

#[derive(Debug, Subcommand)]
pub enum HistorySubcommand {
    /// Show remembered webhooks, most recent last
    List,
    /// Remember a webhook without sending anything
    Add {
        /// Webhook URL
        url: String,
    },
    /// Forget every remembered webhook
    Clear,
}

impl HistoryCommand {
    pub fn run(&self, config: &AppConfig) -> Result<()> {
        let mut history = WebhookHistory::load(&config.history_path);

        match &self.command {
            HistorySubcommand::List => print_history(&history),
            HistorySubcommand::Add { url } => {
                history
                    .record(url.as_str())
                    .context("Failed to save webhook history")?;
                println!("Saved. {} webhook(s) remembered.", history.len());
            }
            HistorySubcommand::Clear => {
                history.clear().context("Failed to save webhook history")?;
                println!("Webhook history cleared.");
            }
        }

        Ok(())
    }
}

pub fn print_history(history: &WebhookHistory) {
    if history.is_empty() {
        println!("No webhooks remembered yet.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Webhook URL").add_attribute(Attribute::Bold),
        ]);

    for (i, url) in history.iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(url)]);
    }

    println!("{table}");
}
