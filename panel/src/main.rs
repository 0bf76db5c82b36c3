use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use comics_core::{ClientConfig, ComicsClient, Session};
use comics_panel::Panel;

/// Control panel for the comics indexing service
#[derive(Parser, Debug)]
#[command(name = "comics-panel", version, about, long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "COMICS_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Operator name; when set together with a password, every command logs in first
    #[arg(long, global = true, env = "COMICS_USER")]
    user: Option<String>,

    #[arg(long, global = true, env = "COMICS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the health of dependent services
    Ping,
    /// Search comics by phrase
    Search {
        phrase: String,
        /// Maximum number of results; anything that is not a number means 10
        #[arg(long, default_value = "10")]
        limit: String,
        /// Use the index-accelerated endpoint instead of a full scan
        #[arg(long)]
        index: bool,
    },
    /// Show index statistics and update status
    Stats,
    /// Start a database update
    Update,
    /// Drop the database (irreversible)
    Drop {
        /// Confirm the drop
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = Arc::new(Session::new());
    let client = ComicsClient::new(ClientConfig::new(&cli.url), Arc::clone(&session));
    let panel = Panel::new(&client, &session);

    if let (Some(user), Some(password)) = (&cli.user, &cli.password) {
        if let Err(message) = panel.login(user, password) {
            bail!(message);
        }
    }

    let lines = match cli.command {
        Command::Ping => panel.services(),
        Command::Search {
            phrase,
            limit,
            index,
        } => panel.search(&phrase, &limit, index),
        Command::Stats => panel.stats(),
        Command::Update => {
            warn_if_anonymous(&panel);
            vec![panel.update()]
        }
        Command::Drop { yes } => {
            warn_if_anonymous(&panel);
            vec![panel.drop_db(yes)]
        }
    };

    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn warn_if_anonymous(panel: &Panel<'_, ComicsClient>) {
    if !panel.is_authenticated() {
        tracing::warn!("no credentials given; the backend requires a token for this command");
    }
}
