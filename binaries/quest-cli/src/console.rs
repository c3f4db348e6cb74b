//! Interactive console
//!
//! One session for the whole REPL: custom fields, quest progress and the
//! trace slots live until the user quits.

use crate::input::{parse_id, parse_new_item, parse_patch, split_args};
use crate::sink::quest_board;
use quest_core::{ActionKind, Error, FieldType, Result};
use quest_dashboard::Dashboard;
use quest_session::{ApiSession, ItemPatch, NewItem};
use serde_json::Value;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = r#"
COMMANDS:
    list                               List items
    create name=… price=… [description=…] [quantity=…]
    random                             Create a generated demo item
    update <id> [name=…] [description=…] [price=…] [quantity=…]
    delete <id>                        Delete an item
    field add <name> <type> [value]    Register a custom field (string|number|boolean)
    field rm <index>                   Remove a custom field
    fields                             Show custom fields and payload schema
    quests                             Show quest board
    trace                              Show the last request and response
    dashboard                          Table, totals and charts
    base-url [url]                     Show or set the API base URL
    help                               Show this help
    quit                               Leave the console
"#;

/// One parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Empty,
    Help,
    List,
    Create(NewItem),
    Random,
    Update { id: i64, patch: ItemPatch },
    Delete(i64),
    FieldAdd { name: String, field_type: FieldType, value: String },
    FieldRemove(usize),
    Fields,
    Quests,
    Trace,
    Dashboard,
    BaseUrl(Option<String>),
    Quit,
}

fn usage(text: &str) -> Error {
    Error::Validation(format!("usage: {text}"))
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let words = split_args(line)?;
        let Some((head, rest)) = words.split_first() else {
            return Ok(Self::Empty);
        };

        let command = match head.to_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "list" | "ls" => Self::List,
            "create" => Self::Create(parse_new_item(rest)?),
            "random" => Self::Random,
            "update" => {
                let (id, fields) = rest
                    .split_first()
                    .ok_or_else(|| usage("update <id> [key=value…]"))?;
                Self::Update {
                    id: parse_id(id)?,
                    patch: parse_patch(fields)?,
                }
            }
            "delete" | "rm" => match rest {
                [id] => Self::Delete(parse_id(id)?),
                _ => return Err(usage("delete <id>")),
            },
            "field" => match rest {
                [sub, name, ty] if sub == "add" => Self::FieldAdd {
                    name: name.clone(),
                    field_type: ty.parse()?,
                    value: String::new(),
                },
                [sub, name, ty, value] if sub == "add" => Self::FieldAdd {
                    name: name.clone(),
                    field_type: ty.parse()?,
                    value: value.clone(),
                },
                [sub, index] if sub == "rm" => Self::FieldRemove(
                    index
                        .parse()
                        .map_err(|_| usage("field rm <index>"))?,
                ),
                _ => return Err(usage("field add <name> <type> [value] | field rm <index>")),
            },
            "fields" => Self::Fields,
            "quests" | "xp" => Self::Quests,
            "trace" => Self::Trace,
            "dashboard" | "dash" => Self::Dashboard,
            "base-url" | "url" => Self::BaseUrl(rest.first().cloned()),
            "quit" | "exit" | "q" => Self::Quit,
            other => {
                return Err(Error::Validation(format!(
                    "unknown command '{other}' (try 'help')"
                )))
            }
        };
        Ok(command)
    }
}

pub struct Console<'a> {
    session: &'a ApiSession,
    dashboard: Dashboard,
}

impl<'a> Console<'a> {
    pub fn new(session: &'a ApiSession, dashboard: Dashboard) -> Self {
        Self { session, dashboard }
    }

    /// Read commands from stdin until `quit` or end of input
    pub async fn run(&mut self) -> anyhow::Result<()> {
        println!("Item Quest console. Type 'help' for commands.");
        println!("API: {}", self.session.base_url().await);
        self.list().await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match ConsoleCommand::parse(&line) {
                Ok(ConsoleCommand::Quit) => break,
                Ok(command) => {
                    debug!(?command, "console command");
                    self.execute(command).await;
                }
                Err(err) => println!("✗ {err}"),
            }
        }
        Ok(())
    }

    async fn execute(&mut self, command: ConsoleCommand) {
        match command {
            ConsoleCommand::Empty | ConsoleCommand::Quit => {}
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::List => self.list().await,
            ConsoleCommand::Create(item) => {
                let outcome = self.session.create(&item).await;
                self.after_mutation(outcome).await;
            }
            ConsoleCommand::Random => {
                let outcome = self.session.create_random().await;
                self.after_mutation(outcome).await;
            }
            ConsoleCommand::Update { id, patch } => {
                let outcome = self.session.update(id, &patch).await;
                self.after_mutation(outcome).await;
            }
            ConsoleCommand::Delete(id) => {
                let outcome = self.session.delete(id).await;
                self.after_mutation(outcome).await;
            }
            ConsoleCommand::FieldAdd {
                name,
                field_type,
                value,
            } => {
                if let Err(err) = self.session.add_field(&name, field_type, &value).await {
                    println!("✗ {err}");
                }
            }
            ConsoleCommand::FieldRemove(index) => {
                if self.session.remove_field(index).await.is_none() {
                    println!("No custom field at index {index}.");
                }
            }
            ConsoleCommand::Fields => {
                let fields = self.session.custom_fields().await;
                if fields.is_empty() {
                    println!("No custom fields.");
                }
                for (idx, field) in fields.iter().enumerate() {
                    println!("  [{idx}] {field}");
                }
                print_json(&Value::Object(self.session.field_preview().await));
            }
            ConsoleCommand::Quests => {
                let progress = self.session.quest_progress().await;
                let mut completed = Vec::new();
                for kind in ActionKind::ALL {
                    completed.push((kind, self.session.is_quest_completed(kind).await));
                }
                print!(
                    "{}",
                    quest_board(&progress, &completed, self.session.request_count())
                );
            }
            ConsoleCommand::Trace => {
                match self.session.last_request().await {
                    Some(request) => print_json(&request),
                    None => println!("No request yet."),
                }
                if let Some(response) = self.session.last_response().await {
                    print_json(&response);
                }
            }
            ConsoleCommand::Dashboard => {
                if let Err(err) = self.dashboard.refresh_from(self.session).await {
                    println!("✗ dashboard fetch failed: {err}");
                }
            }
            ConsoleCommand::BaseUrl(None) => println!("API: {}", self.session.base_url().await),
            ConsoleCommand::BaseUrl(Some(url)) => {
                if let Err(err) = self.session.set_base_url(&url).await {
                    println!("✗ {err}");
                }
            }
        }
    }

    async fn list(&self) {
        match self.session.list().await {
            Ok(data) => print_json(&data),
            Err(err) => println!("✗ {err}"),
        }
    }

    /// Show the result; on success reload the list
    async fn after_mutation(&self, outcome: Result<Value>) {
        match outcome {
            Ok(data) => {
                print_json(&data);
                self.list().await;
            }
            Err(err) => println!("✗ {err}"),
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => println!("✗ {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(ConsoleCommand::parse("   ").unwrap(), ConsoleCommand::Empty);
        assert_eq!(ConsoleCommand::parse("LIST").unwrap(), ConsoleCommand::List);
        assert_eq!(ConsoleCommand::parse("delete 4").unwrap(), ConsoleCommand::Delete(4));
        assert_eq!(ConsoleCommand::parse("quit").unwrap(), ConsoleCommand::Quit);
        assert_eq!(
            ConsoleCommand::parse("base-url http://localhost:8000/").unwrap(),
            ConsoleCommand::BaseUrl(Some("http://localhost:8000/".to_string()))
        );
    }

    #[test]
    fn test_parse_update() {
        let command = ConsoleCommand::parse(r#"update 7 name="Desk Lamp" price=3"#).unwrap();
        assert_eq!(
            command,
            ConsoleCommand::Update {
                id: 7,
                patch: ItemPatch {
                    name: Some("Desk Lamp".to_string()),
                    price: Some(3.0),
                    ..Default::default()
                },
            }
        );
        assert!(ConsoleCommand::parse("update").is_err());
        assert!(ConsoleCommand::parse("update seven").is_err());
    }

    #[test]
    fn test_parse_field_commands() {
        assert_eq!(
            ConsoleCommand::parse("field add featured boolean true").unwrap(),
            ConsoleCommand::FieldAdd {
                name: "featured".to_string(),
                field_type: FieldType::Boolean,
                value: "true".to_string(),
            }
        );
        assert_eq!(
            ConsoleCommand::parse("field rm 2").unwrap(),
            ConsoleCommand::FieldRemove(2)
        );
        assert!(ConsoleCommand::parse("field add x date 1").is_err());
        assert!(ConsoleCommand::parse("field rm last").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = ConsoleCommand::parse("frobnicate").unwrap_err();
        assert!(err.to_string().contains("unknown command"));
    }
}
