//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Salesdash - monthly sales reports over a product transaction feed
#[derive(Parser)]
#[command(name = "salesdash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve the HTTP API (default)
    #[command(alias = "s")]
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load the product feed into the database once and exit
    Ingest,

    /// Write a default config.toml if none exists
    Init,
}

impl Cli {
    /// The subcommand to run, falling back to `serve`.
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Serve { port: None })
    }
}
