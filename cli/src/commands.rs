//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for chatline
#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(author, version, about = "Terminal chat client with persisted conversations")]
#[command(long_about = r#"
chatline sends messages to a chat backend and keeps up to ten independent
conversations on disk. Replies are streamed to the terminal as they arrive.

Configuration files are loaded from (in priority order):
1. CHATLINE_* environment variables (e.g. CHATLINE_BACKEND__BASE_URL)
2. --config <path>     Explicit config file
3. ./chatline.toml     Project-level config
4. ~/.config/chatline/config.toml   Global config

The bearer token is read from [auth] token or the $CHATLINE_TOKEN variable.

Example:
  chatline send "What's the capital of France?"
  chatline sessions
  chatline chat
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Keep sessions in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send one message and stream the reply
    Send {
        /// Message text
        text: String,

        /// Session to send in (defaults to the newest)
        #[arg(short, long, value_name = "ID")]
        session: Option<String>,
    },

    /// List sessions, newest first
    Sessions,

    /// Start a new session and print its id
    New,

    /// Close a session
    Close {
        /// Session id
        id: String,
    },

    /// Print a session's messages
    Show {
        /// Session id
        id: String,
    },

    /// Interactive chat (default)
    Chat,
}
