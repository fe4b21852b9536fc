use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use symphony::UserId;

pub const DEFAULT_WELCOME: &str = "Welcome {user}!";

#[derive(Debug, Parser, Clone)]
#[command(name = "symphony-bot")]
#[command(about = "Example Symphony bots built on the symphony SDK")]
pub struct Cli {
    /// Bot configuration file (JSON).
    #[arg(long, env = "SYMPHONY_CONFIG", default_value = "bot-config.json")]
    pub config: PathBuf,

    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, default_value_t = false)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reply to every chat and room message with its text.
    Echo(EchoArgs),
    /// Welcome users joining rooms the bot is in.
    Greeter(GreeterArgs),
    /// Log presence changes.
    Presence(PresenceArgs),
    /// Print every firehose event as a JSON line.
    Audit,
}

#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct EchoArgs {
    /// Accept incoming connection requests.
    #[arg(long, default_value_t = false)]
    pub auto_accept: bool,
}

#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct GreeterArgs {
    /// Welcome text; `{user}` is replaced by a mention of the new member.
    #[arg(long, default_value = DEFAULT_WELCOME)]
    pub message: String,
}

#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct PresenceArgs {
    /// Comma-separated user ids to follow. Empty logs every change.
    #[arg(long, value_delimiter = ',')]
    pub users: Vec<UserId>,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Echo(_) => "echo",
            Self::Greeter(_) => "greeter",
            Self::Presence(_) => "presence",
            Self::Audit => "audit",
        }
    }
}
