use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use vaidhya_types::API_URL_ENV;

/// CLI arguments for vaidhya
#[derive(Parser, Debug)]
#[command(name = "vaidhya")]
#[command(about = "Vaidhya - talk to the medical assistant from your terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (default: http://localhost:5000)
    #[arg(long, value_name = "URL", env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// File holding the persisted session id (default: ~/.vaidhya/session.json)
    #[arg(long, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Send a single message, print the reply and exit
    #[arg(long, short = 'm', value_name = "TEXT")]
    pub message: Option<String>,

    /// Greeting shown when a conversation starts
    #[arg(long, value_name = "TEXT", env = "VAIDHYA_WELCOME")]
    pub welcome: Option<String>,

    /// Dump every HTTP request and response to the logs directory
    #[arg(long)]
    pub log_http: bool,

    /// Enable debug logging (written to ~/.vaidhya/logs)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check that the backend is reachable
    Health,
    /// Print the current session id, creating one if needed
    Session,
    /// Start a new session on the backend
    Reset,
}
