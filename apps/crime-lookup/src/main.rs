//! crime-lookup
//!
//! Terminal client that resolves free-text offense names against the hosted
//! crime dataset and prints a reference card.

mod config;
mod error;
mod loader;
mod render;
mod session;
mod theme;

#[cfg(test)]
mod test_support;

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::config::{default_prefs_path, fetch_deadline, DEFAULT_CRIMES_API, DEFAULT_FETCH_TIMEOUT_SECS};
use crate::loader::{DatasetLoader, HttpSource};
use crate::session::{LookupSession, OutputFormat};
use crate::theme::{FilePreferenceStore, Theme};

#[derive(Parser, Debug)]
#[command(name = "crime-lookup")]
#[command(about = "Look up offense reference cards by name, section or id")]
#[command(version)]
struct Cli {
    /// URL of the crime JSON dataset
    #[arg(long, env = "CRIMES_API", default_value = DEFAULT_CRIMES_API)]
    url: String,

    /// Seconds before the dataset fetch is abandoned
    #[arg(long, env = "CRIMES_FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Preferences file (theme)
    #[arg(long, env = "CRIME_LOOKUP_PREFS")]
    prefs: Option<PathBuf>,

    /// Render HTML instead of terminal text
    #[arg(long)]
    html: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a name once and print the result
    Search {
        /// Crime name, section or id
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// Print the auto-complete name list
    Names {
        #[arg(long, default_value_t = crime_core::SUGGESTION_NAME_LIMIT)]
        limit: usize,
    },

    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeAction {
    Show,
    Toggle,
    Set { theme: Theme },
}

type Session = LookupSession<HttpSource, FilePreferenceStore>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let prefs = FilePreferenceStore::new(cli.prefs.clone().unwrap_or_else(default_prefs_path));
    tracing::debug!("Preferences at {}", prefs.path().display());
    let theme = theme::initial_theme(&prefs, theme::system_prefers_dark());

    let format = if cli.html {
        OutputFormat::Html
    } else {
        let color = !cli.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();
        OutputFormat::Text { color }
    };

    let source = HttpSource::new(cli.url.clone()).context("building HTTP client")?;
    let loader = DatasetLoader::new(source, fetch_deadline(cli.timeout_secs));
    let mut session = LookupSession::new(loader, prefs, theme, format);

    match cli.command {
        Some(Commands::Search { words }) => {
            println!("{}", session.search(&words.join(" ")).await);
        }
        Some(Commands::Names { limit }) => {
            let names = session
                .names(limit)
                .await
                .context("Failed to load crime data")?;
            for name in names {
                println!("{}", name);
            }
        }
        Some(Commands::Theme { action }) => run_theme(&mut session, action)?,
        None => run_interactive(&mut session).await?,
    }

    Ok(())
}

fn run_theme(session: &mut Session, action: ThemeAction) -> Result<()> {
    match action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            session.toggle_theme()?;
        }
        ThemeAction::Set { theme } => session.set_theme(theme)?,
    }
    println!("{}", session.theme());
    Ok(())
}

const HELP: &str = "Type a crime name, IPC section or id.
  :pick N    open the Nth suggestion
  :names     list known crime names
  :theme     toggle dark/light theme
  :reload    fetch the dataset again
  :quit      exit";

async fn run_interactive(session: &mut Session) -> Result<()> {
    println!("{}", "Crime lookup".bold());
    println!("{}", HELP.dimmed());

    // Kick off the fetch before the first query
    if let Err(e) = session.preload().await {
        eprintln!("Failed to load crime data: {}", e);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line.split_once(' ').map_or((line, ""), |(c, rest)| (c, rest.trim())) {
            (":quit" | ":q", _) => break,
            (":help", _) => println!("{}", HELP),
            (":theme", _) => match session.toggle_theme() {
                Ok(theme) => println!("Theme: {}", theme),
                Err(e) => eprintln!("{}", e),
            },
            (":reload", _) => {
                session.reload().await;
                match session.preload().await {
                    Ok(count) => println!("Loaded {} crime records", count),
                    Err(e) => eprintln!("Failed to load crime data: {}", e),
                }
            }
            (":names", _) => match session.names(crime_core::SUGGESTION_NAME_LIMIT).await {
                Ok(names) => println!("{}", names.join("\n")),
                Err(e) => eprintln!("Failed to load crime data: {}", e),
            },
            (":pick", n) => match n.parse::<usize>().ok() {
                Some(n) => match session.pick(n).await {
                    Some(out) => println!("{}", out),
                    None => println!("No suggestion #{}", n),
                },
                None => println!("Usage: :pick N"),
            },
            _ => println!("{}", session.search(line).await),
        }
    }

    Ok(())
}
