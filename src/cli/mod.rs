// CLI module for hinglish-bridge
// Author: kelexine (https://github.com/kelexine)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hinglish-bridge - Translate coding-problem descriptions to Hinglish
#[derive(Parser, Debug)]
#[command(name = "hinglish-bridge", version, about, long_about = None)]
pub struct Args {
    /// Config file (default: ~/.hinglish-bridge/config.toml)
    #[arg(long, global = true, env = "HINGLISH_BRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep cache and settings in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the local translation service (default)
    Serve,

    /// Translate a single problem description and print the result
    Translate {
        /// Cache key; derived from --url/--title when omitted
        #[arg(long)]
        problem_id: Option<String>,

        /// Problem page URL or path, used to derive the problem id
        #[arg(long)]
        url: Option<String>,

        /// Page title, used when the URL has no problem slug
        #[arg(long)]
        title: Option<String>,

        /// Read the description from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Collapse whitespace and cap input length before sending
        #[arg(long)]
        sanitize: bool,

        /// Strip any model preamble from the output
        #[arg(long)]
        clean: bool,
    },

    /// Manage the translation cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage the provider API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Turn translation on
    Enable,

    /// Turn translation off
    Disable,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CacheAction {
    /// Remove every cached translation
    Clear,
    /// Remove expired translations only
    Prune,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Store the API key
    Set { key: String },
    /// Remove the stored API key
    Clear,
    /// Report whether a key is configured
    Status,
}
