//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Environment variable overriding the configured service URL
pub const API_URL_ENV: &str = "VOICE_DIARY_API_URL";

/// Voice Diary - speak your day, get a structured diary entry back
#[derive(Parser, Debug)]
#[command(name = "voice-diary")]
#[command(version)]
#[command(about = "Record spoken diary entries and browse them")]
#[command(long_about = None)]
pub struct Cli {
    /// Diary service base URL (e.g., http://localhost:8000)
    #[arg(long, global = true, value_name = "URL", env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new entry (press Enter to finish, Ctrl+C to discard)
    Record {
        /// Also print the raw transcript
        #[arg(long)]
        transcript: bool,
    },
    /// List diary entries, newest first
    List {
        /// Page number (1-indexed)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Entries per page (1-100)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        limit: Option<u32>,
    },
    /// Show a diary entry
    Show {
        /// Entry id
        id: String,
        /// Also print the raw transcript
        #[arg(long)]
        transcript: bool,
    },
    /// Delete a diary entry
    Delete {
        /// Entry id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Search diary entries
    Search {
        /// Search text
        #[arg(value_parser = parse_query)]
        query: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_url",
    "page_limit",
    "max_display_duration",
    "request_timeout",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

fn parse_query(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("search query must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}
