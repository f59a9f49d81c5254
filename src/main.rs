use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cockpit::response::metadata_summary;
use cockpit::{Cockpit, Config, History, Role, Theme, WebhookClient};

#[derive(Parser)]
#[command(name = "cockpit")]
#[command(about = "Chat with webhook-backed bots and render their markdown replies")]
struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = "cockpit.toml")]
    config: PathBuf,

    /// History file (overrides the config)
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a markdown message to HTML or JSON
    Render {
        /// Input file, or `-` for stdin
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Html)]
        format: Format,

        /// Defaults to the saved theme
        #[arg(long, value_enum)]
        theme: Option<Theme>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the configured bots
    Bots,

    /// Send a message to a bot and print its reply
    Send {
        #[arg(short, long)]
        bot: String,

        /// Session token from the identity provider
        #[arg(long, env = "COCKPIT_SESSION_TOKEN", hide_env_values = true)]
        token: Option<String>,

        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Send an assistant reply to the documentation workflow
    AddToDoku {
        #[arg(short, long)]
        bot: String,

        /// Message index in the conversation (defaults to the latest reply)
        #[arg(short, long)]
        index: Option<usize>,

        #[arg(long, env = "COCKPIT_SESSION_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Show, clear or export a conversation
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Set the theme, or toggle it when none is given
    Theme {
        #[arg(value_enum)]
        theme: Option<Theme>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    Show {
        #[arg(short, long)]
        bot: String,
    },
    Clear {
        #[arg(short, long)]
        bot: String,
    },
    Export {
        #[arg(short, long)]
        bot: String,

        /// Defaults to `<bot>-history-<date>.json`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("COCKPIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?.with_env_overrides();
    let history_path = cli
        .history
        .clone()
        .unwrap_or_else(|| config.history.path.clone());
    let load_history = || {
        History::load(&history_path, config.display.theme)
            .with_context(|| format!("reading history {}", history_path.display()))
    };

    match cli.command {
        Command::Render {
            input,
            format,
            theme,
            output,
        } => {
            let markdown = read_input(&input)?;
            let rendered = match format {
                Format::Html => {
                    let theme = match theme {
                        Some(theme) => theme,
                        None => load_history()?.theme(),
                    };
                    cockpit::render_html(&markdown, theme)
                }
                Format::Json => cockpit::render_json(&markdown)?,
            };
            write_output(output.as_deref(), &rendered)?;
        }

        Command::Bots => {
            for bot in &config.bots {
                let docs = if bot.docs { " [docs]" } else { "" };
                println!("{:<16} {}{} - {}", bot.id, bot.name, docs, bot.description);
            }
        }

        Command::Send {
            bot,
            token,
            message,
        } => {
            let client = WebhookClient::new(&config.webhook, token)?;
            let mut session = Cockpit::new(config.bots.clone(), load_history()?, client);

            if let Some(reply) = session.send(&bot, &message.join(" "))? {
                println!("{}", reply.content);
                if let Some(summary) = reply.metadata.as_ref().and_then(metadata_summary) {
                    println!("\n{summary}");
                }
            }
            session.into_history().save(&history_path)?;
        }

        Command::AddToDoku { bot, index, token } => {
            let client = WebhookClient::new(&config.webhook, token)?;
            let session = Cockpit::new(config.bots.clone(), load_history()?, client);
            session.add_to_docs(&bot, index)?;
            println!("Reply added to the documentation");
        }

        Command::History { action } => match action {
            HistoryAction::Show { bot } => {
                let bot = config.bot(&bot)?;
                let history = load_history()?;
                for (i, message) in history.messages(&bot.id).iter().enumerate() {
                    let who = match message.role {
                        Role::User => "you",
                        Role::Assistant if message.is_error => "error",
                        Role::Assistant => bot.name.as_str(),
                    };
                    println!("[{i}] {who} @ {}", message.timestamp.to_rfc3339());
                    println!("{}\n", message.content);
                }
            }
            HistoryAction::Clear { bot } => {
                let bot = config.bot(&bot)?;
                let mut history = load_history()?;
                history.clear(&bot.id);
                history.save(&history_path)?;
            }
            HistoryAction::Export { bot, output } => {
                let bot = config.bot(&bot)?;
                let history = load_history()?;
                let export = history.export(&bot.id, &bot.name, Utc::now());
                let path = output.unwrap_or_else(|| PathBuf::from(export.file_name()));
                fs::write(&path, serde_json::to_string_pretty(&export)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Exported {}", path.display());
            }
        },

        Command::Theme { theme } => {
            let mut history = load_history()?;
            let theme = theme.unwrap_or_else(|| history.theme().toggled());
            history.set_theme(theme);
            history.save(&history_path)?;
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut markdown = String::new();
        io::stdin().read_to_string(&mut markdown)?;
        return Ok(markdown);
    }
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
