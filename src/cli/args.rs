//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "tutor")]
#[command(author, version, about = "Terminal client for a streaming chat tutor", long_about = None)]
pub struct Cli {
    /// Chat endpoint URL (overrides config and TUTOR_ENDPOINT)
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// User id forwarded with every request
    #[arg(short, long, global = true)]
    pub user_id: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Flag values in the same shape as the file/env layers.
    #[must_use]
    pub fn overrides(&self) -> AppConfig {
        AppConfig {
            endpoint: self.endpoint.clone(),
            user_id: self.user_id.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigSubcommands,
    },
    /// Ask a single question and stream the answer to stdout
    Ask {
        /// The question to send
        text: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommands {
    /// Initialize a new config file
    Init,
    /// Print config file location
    Where,
}
