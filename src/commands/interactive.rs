//! Line-oriented compose session
//!
//! Reads commands from stdin and keeps accepting them while a send runs in
//! the background.

use super::history::print_history;
use super::{build_transport, load_attachment, parse_name_value};
use anyhow::Result;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use dishook_composer::{
    AppConfig, DraftField, FieldId, Session, SubmissionError, SubmitReport, WebhookHistory,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  set <field> <value>           set a text field (see `fields-help`)
  timestamp on|off              stamp the embed with the send time
  attach <path> | detach        set or drop the file attachment
  field add <name>=<value> [inline]
  field rm <id>
  fields                        list embed fields
  show                          show the draft
  send                          send in the background
  clear                         reset message and embed
  history                       list remembered webhooks
  quit";

/// Compose and send messages interactively
#[derive(Debug, Args)]
pub struct InteractiveCommand {
    /// Webhook URL (defaults to the most recently used one)
    #[arg(long, short)]
    pub webhook: Option<String>,

    /// Log messages instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum ReplCommand {
    Set(DraftField, String),
    Timestamp(bool),
    Attach(PathBuf),
    Detach,
    FieldAdd {
        name: String,
        value: String,
        inline: bool,
    },
    FieldRemove(FieldId),
    Fields,
    Show,
    Send,
    Clear,
    History,
    Help,
    FieldsHelp,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb {
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = field.parse::<DraftField>().map_err(|e| e.to_string())?;
            ReplCommand::Set(field, value.trim().to_string())
        }
        "unset" => {
            let field = rest.parse::<DraftField>().map_err(|e| e.to_string())?;
            ReplCommand::Set(field, String::new())
        }
        "timestamp" => match rest {
            "on" => ReplCommand::Timestamp(true),
            "off" => ReplCommand::Timestamp(false),
            _ => return Err("usage: timestamp on|off".to_string()),
        },
        "attach" if !rest.is_empty() => ReplCommand::Attach(PathBuf::from(rest)),
        "detach" => ReplCommand::Detach,
        "field" => {
            let (action, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            match action {
                "add" => {
                    let args = args.trim();
                    let (pair, inline) = match args.strip_suffix(" inline") {
                        Some(pair) => (pair, true),
                        None => (args, false),
                    };
                    let (name, value) = parse_name_value(pair)?;
                    ReplCommand::FieldAdd {
                        name,
                        value,
                        inline,
                    }
                }
                "rm" => {
                    let id = args
                        .parse::<FieldId>()
                        .map_err(|_| format!("invalid field id '{}'", args.trim()))?;
                    ReplCommand::FieldRemove(id)
                }
                _ => return Err("usage: field add <name>=<value> [inline] | field rm <id>".to_string()),
            }
        }
        "fields" => ReplCommand::Fields,
        "show" => ReplCommand::Show,
        "send" => ReplCommand::Send,
        "clear" => ReplCommand::Clear,
        "history" => ReplCommand::History,
        "help" | "?" => ReplCommand::Help,
        "fields-help" => ReplCommand::FieldsHelp,
        "quit" | "exit" => ReplCommand::Quit,
        _ => return Err(format!("unknown command '{}', try 'help'", line)),
    };

    Ok(Some(command))
}

impl InteractiveCommand {
    pub async fn run(&self, config: &AppConfig) -> Result<()> {
        let history = WebhookHistory::load(&config.history_path);

        let mut draft = config.new_draft();
        if let Some(webhook_url) = self.webhook.as_deref().or(history.latest()) {
            draft.set_field(DraftField::WebhookUrl, webhook_url);
        }

        let transport = build_transport(config, self.dry_run)?;
        let mut session = Session::with_draft(draft, transport, history);

        println!("{HELP}");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse_command(&line) {
                        Ok(Some(ReplCommand::Quit)) => break,
                        Ok(Some(command)) => apply(&mut session, command).await,
                        Ok(None) => {}
                        Err(message) => println!("Error: {message}"),
                    }
                }
                Some(result) = session.wait(), if session.is_sending() => {
                    print_result(&result);
                }
            }
        }

        // sends are never cancelled
        if let Some(result) = session.wait().await {
            print_result(&result);
        }
        Ok(())
    }
}

async fn apply(session: &mut Session, command: ReplCommand) {
    debug!(?command, "Interactive command");
    let draft = session.draft_mut();

    match command {
        ReplCommand::Set(field, value) => draft.set_field(field, value),
        ReplCommand::Timestamp(enabled) => draft.set_timestamp(enabled),
        ReplCommand::Attach(path) => match load_attachment(&path).await {
            Ok(attachment) => {
                println!("Attached {} ({} bytes)", attachment.filename, attachment.bytes.len());
                session.draft_mut().set_attachment(Some(attachment));
            }
            Err(e) => println!("Error: {e:#}"),
        },
        ReplCommand::Detach => draft.set_attachment(None),
        ReplCommand::FieldAdd {
            name,
            value,
            inline,
        } => {
            let id = draft.add_field(name, value, inline);
            println!("Added field {id}");
        }
        ReplCommand::FieldRemove(id) => {
            if !draft.remove_field(id) {
                println!("Error: no field with id {id}");
            }
        }
        ReplCommand::Fields => print_fields(session),
        ReplCommand::Show => print_draft(session),
        ReplCommand::Send => match session.begin_send() {
            Ok(()) => println!("Sending..."),
            Err(e) => println!("Error: {e}"),
        },
        ReplCommand::Clear => {
            draft.clear();
            println!("Draft cleared.");
        }
        ReplCommand::History => print_history(session.history()),
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::FieldsHelp => {
            let names: Vec<&str> = DraftField::ALL.iter().map(|f| f.as_str()).collect();
            println!("Fields: {}", names.join(", "));
        }
        ReplCommand::Quit => {}
    }
}

fn print_result(result: &Result<SubmitReport, SubmissionError>) {
    match result {
        Ok(report) => match report.error() {
            None => println!("Message sent successfully!"),
            Some(error) => println!("{error}"),
        },
        Err(error) => println!("{error}"),
    }
}

fn print_fields(session: &Session) {
    let fields = session.draft().fields();
    if fields.is_empty() {
        println!("No embed fields.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
            Cell::new("Inline").add_attribute(Attribute::Bold),
        ]);
    for row in fields {
        table.add_row(vec![
            Cell::new(row.id),
            Cell::new(&row.name),
            Cell::new(&row.value),
            Cell::new(if row.inline { "yes" } else { "no" }),
        ]);
    }
    println!("{table}");
}

fn print_draft(session: &Session) {
    let draft = session.draft();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Field").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

    for field in DraftField::ALL {
        let value = draft.field(field);
        if !value.is_empty() {
            table.add_row(vec![Cell::new(field), Cell::new(value)]);
        }
    }
    if draft.embed.timestamp {
        table.add_row(vec![Cell::new("timestamp"), Cell::new("on")]);
    }
    if let Some(attachment) = &draft.attachment {
        table.add_row(vec![
            Cell::new("attachment"),
            Cell::new(format!("{} ({} bytes)", attachment.filename, attachment.bytes.len())),
        ]);
    }

    println!("{table}");
    print_fields(session);
    if session.is_sending() {
        println!("(send in progress)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_command("set content hello there"),
            Ok(Some(ReplCommand::Set(
                DraftField::Content,
                "hello there".to_string()
            )))
        );
        assert_eq!(
            parse_command("unset title"),
            Ok(Some(ReplCommand::Set(DraftField::Title, String::new())))
        );
        assert!(parse_command("set nonsense x").is_err());
    }

    #[test]
    fn test_parse_field_commands() {
        assert_eq!(
            parse_command("field add Env=prod inline"),
            Ok(Some(ReplCommand::FieldAdd {
                name: "Env".to_string(),
                value: "prod".to_string(),
                inline: true,
            }))
        );
        assert_eq!(
            parse_command("field add Notes=a b c"),
            Ok(Some(ReplCommand::FieldAdd {
                name: "Notes".to_string(),
                value: "a b c".to_string(),
                inline: false,
            }))
        );
        assert_eq!(
            parse_command("field rm 3"),
            Ok(Some(ReplCommand::FieldRemove("3".parse().unwrap())))
        );
        assert!(parse_command("field rm x").is_err());
        assert!(parse_command("field swap 1").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("send"), Ok(Some(ReplCommand::Send)));
        assert_eq!(parse_command("timestamp on"), Ok(Some(ReplCommand::Timestamp(true))));
        assert!(parse_command("timestamp maybe").is_err());
        assert_eq!(
            parse_command("attach ./report.csv"),
            Ok(Some(ReplCommand::Attach(PathBuf::from("./report.csv"))))
        );
        assert!(parse_command("attach").is_err());
        assert_eq!(parse_command("exit"), Ok(Some(ReplCommand::Quit)));
        assert!(parse_command("dance").is_err());
    }
}
