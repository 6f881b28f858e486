mod commands;
mod config;
mod directory;
mod dispatch;
mod registry;
mod tickets;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;
use crate::directory::Directory;
use crate::dispatch::{Dispatcher, Message};
use crate::tickets::{MemoryTicketStore, TicketService};

#[derive(Parser)]
#[command(name = "ticketbot")]
#[command(version, about = "Chat-command ticket bot", long_about = None)]
struct Cli {
    /// Load environment variables from FILE instead of `.env`
    #[arg(long, global = true, value_name = "FILE")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read chat messages from stdin, one per line, and print the replies
    Run(RunArgs),

    /// Parse TEXT against a command's arguments and print the result as JSON
    Parse(ParseArgs),

    /// Show help for every registered command
    #[command(name = "commands")]
    List,
}

#[derive(Parser)]
struct RunArgs {
    /// Author id of incoming messages (`/author <ID>` on stdin switches it)
    #[arg(long, default_value = "1", value_name = "ID")]
    author: String,

    /// Channel id of incoming messages (`/channel <ID>` on stdin switches it)
    #[arg(long, default_value = "2", value_name = "ID")]
    channel: String,

    /// JSON file with known users and channels
    #[arg(long, value_name = "FILE")]
    directory: Option<PathBuf>,
}

#[derive(Parser)]
struct ParseArgs {
    /// Command name or alias
    #[arg(value_name = "COMMAND")]
    command: String,

    /// Argument text, as typed after the command name
    #[arg(value_name = "TEXT", trailing_var_arg = true, allow_hyphen_values = true)]
    text: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load(cli.env_file.as_deref())?;

    match cli.command {
        Commands::Run(args) => run(config, args),
        Commands::Parse(args) => parse_command(args),
        Commands::List => list_commands(),
    }
}

fn run(config: Config, args: RunArgs) -> Result<()> {
    let directory = match &args.directory {
        Some(path) => Directory::from_file(path)?,
        None => Directory::new(),
    };
    tracing::debug!(entities = directory.len(), prefix = %config.prefix, "starting dispatcher");

    let registry = commands::registry().context("failed to register commands")?;
    let tickets = TicketService::new(MemoryTicketStore::default());
    let mut dispatcher = Dispatcher::new(config, registry, directory, tickets);

    let mut author = args.author;
    let mut channel = args.channel;
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if let Some(id) = line.strip_prefix("/author ") {
            author = id.trim().to_string();
            continue;
        }
        if let Some(id) = line.strip_prefix("/channel ") {
            channel = id.trim().to_string();
            continue;
        }

        let message = Message {
            author_id: author.clone(),
            channel_id: channel.clone(),
            content: line,
        };
        if let Some(reply) = dispatcher.handle(&message) {
            writeln!(stdout, "{reply}")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn parse_command(args: ParseArgs) -> Result<()> {
    let registry = commands::registry().context("failed to register commands")?;
    let Some((meta, _)) = registry.get(&args.command) else {
        bail!("unknown command: {}", args.command);
    };

    let result = chat_argparse::parse(&args.text.join(" "), &meta.args);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn list_commands() -> Result<()> {
    let registry = commands::registry().context("failed to register commands")?;
    let sections: Vec<String> = registry.metas().iter().map(chat_argparse::help).collect();
    print!("{}", sections.join("\n"));
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
