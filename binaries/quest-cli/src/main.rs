//! Item Quest CLI
//!
//! Terminal console for an item-management REST API: CRUD requests with
//! request/response traces, quest progress, custom payload fields and a
//! dashboard over the item collection.

mod console;
mod input;
mod sink;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use console::Console;
use input::parse_field_spec;
use quest_config::ConfigStore;
use quest_core::PresentationSink;
use quest_dashboard::Dashboard;
use quest_session::{ApiSession, ItemPatch, NewItem};
use sink::TerminalSink;

#[derive(Parser)]
#[command(name = "item-quest")]
#[command(about = "Item Quest - interactive console for an item-management REST API")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/item-quest/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print request and response traces for one-shot commands
    #[arg(short, long, global = true)]
    trace: bool,

    /// Without a command the interactive console starts
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change the API base URL
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List items
    List,

    /// Create an item
    Create {
        /// Item name
        #[arg(long)]
        name: String,

        /// Price
        #[arg(long)]
        price: f64,

        /// Quantity
        #[arg(short, long, default_value_t = 0)]
        quantity: i64,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Custom field, `name:type=value` (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Create a generated demo item
    Random {
        /// Custom field, `name:type=value` (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Update an item; only given fields are sent
    Update {
        /// Item id
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(short, long)]
        quantity: Option<i64>,

        #[arg(short, long)]
        description: Option<String>,

        /// Custom field, `name:type=value` (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Delete an item
    Delete {
        /// Item id
        id: i64,
    },

    /// Table, totals and charts over all items
    Dashboard,

    /// Interactive console (default)
    Console,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the base URL and config file location
    Show,

    /// Set the base URL (one trailing slash is dropped)
    Set {
        /// e.g. http://localhost:8000
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is the presentation surface
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,quest_session=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigStore::open(path),
        None => ConfigStore::default_location(),
    }
    .context("failed to load config")?;
    let config_path = config.path().to_path_buf();

    let command = cli.command.unwrap_or(Commands::Console);
    let interactive = matches!(command, Commands::Console);
    let sink: Arc<dyn PresentationSink> = Arc::new(TerminalSink::new(interactive || cli.trace));
    let session = ApiSession::with_http(config, sink.clone());

    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                println!("base_url: {}", session.base_url().await);
                println!("file:     {}", config_path.display());
            }
            ConfigCommands::Set { url } => {
                session.set_base_url(&url).await?;
            }
        },

        Commands::List => print_json(&session.list().await?),

        Commands::Create {
            name,
            price,
            quantity,
            description,
            fields,
        } => {
            register_fields(&session, &fields).await?;
            let item = NewItem {
                name,
                description: description.filter(|d| !d.is_empty()),
                price,
                quantity,
            };
            print_json(&session.create(&item).await?);
        }

        Commands::Random { fields } => {
            register_fields(&session, &fields).await?;
            print_json(&session.create_random().await?);
        }

        Commands::Update {
            id,
            name,
            price,
            quantity,
            description,
            fields,
        } => {
            register_fields(&session, &fields).await?;
            let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
            let patch = ItemPatch {
                name: non_empty(name),
                description: non_empty(description),
                price,
                quantity,
            };
            print_json(&session.update(id, &patch).await?);
        }

        Commands::Delete { id } => print_json(&session.delete(id).await?),

        Commands::Dashboard => {
            let mut dashboard = Dashboard::new(sink);
            dashboard.refresh_from(&session).await?;
        }

        Commands::Console => {
            let mut console = Console::new(&session, Dashboard::new(sink));
            console.run().await?;
        }
    }

    Ok(())
}

/// Register `--field name:type=value` flags for a one-shot command
async fn register_fields(session: &ApiSession, specs: &[String]) -> Result<()> {
    for spec in specs {
        let field = parse_field_spec(spec)?;
        session
            .add_field(&field.name, field.field_type, &field.value)
            .await
            .with_context(|| format!("invalid --field '{spec}'"))?;
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("{err}"),
    }
}
