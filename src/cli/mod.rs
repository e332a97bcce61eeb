//! Command-line interface for the zamculture server.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Community site for sharing Zambian cultural stories.
#[derive(Parser)]
#[command(name = "zamculture")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file, overriding the default search locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create an administrator account
    CreateAdmin {
        /// Login name for the new admin
        username: String,
        /// Password; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// List categories with their approved story counts
    #[command(alias = "ls")]
    Categories,
}

pub use commands::*;
