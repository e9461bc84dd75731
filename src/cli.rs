//! Command-line interface parsing for hncli
//!
//! This module defines the subcommands with clap and the coercion rules used by
//! `config-set` to turn a command-line string into a JSON setting.

use clap::{Parser, Subcommand};
use serde_json::Value;
use thiserror::Error;

use crate::data::Category;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// A count argument was zero or not a number
    #[error("Invalid count: '{0}'. Expected a positive whole number")]
    InvalidCount(String),
}

/// Parses a strictly positive count such as `--limit` or `--comments`
pub fn parse_count(s: &str) -> Result<usize, CliError> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CliError::InvalidCount(s.to_string())),
    }
}

/// Hacker News CLI - browse stories, comments and users from the terminal
#[derive(Parser, Debug)]
#[command(name = "hncli")]
#[command(about = "Hacker News CLI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show top stories with interactive browsing
    Top {
        /// Stories per page instead of fitting the terminal
        #[arg(long, value_parser = parse_count)]
        limit: Option<usize>,
    },
    /// Show new stories with interactive browsing
    New {
        /// Stories per page instead of fitting the terminal
        #[arg(long, value_parser = parse_count)]
        limit: Option<usize>,
    },
    /// Show best stories with interactive browsing
    Best {
        /// Stories per page instead of fitting the terminal
        #[arg(long, value_parser = parse_count)]
        limit: Option<usize>,
    },
    /// Show a specific story and its comments
    Story {
        /// Item ID of the story
        item_id: u64,
        /// Number of top-level comments to display
        #[arg(short = 'c', long, value_parser = parse_count)]
        comments: Option<usize>,
    },
    /// Show a user profile
    User {
        /// Username (case-sensitive)
        username: String,
    },
    /// Search recent stories by title or text
    ///
    /// Scans the first 100 stories of the top, new and best lists locally.
    Search {
        /// Text to look for, case-insensitive
        query: String,
        /// Stories per page instead of fitting the terminal
        #[arg(long, value_parser = parse_count)]
        limit: Option<usize>,
    },
    /// Open a story in the web browser
    Open {
        /// Item ID of the story
        story_id: u64,
    },
    /// Update a configuration setting
    ConfigSet {
        /// Setting name
        key: String,
        /// New value; true/false and whole numbers are stored typed
        value: String,
    },
    /// Get current configuration settings
    ConfigGet {
        /// Only print this setting
        #[arg(long)]
        key: Option<String>,
    },
    /// Reset configuration to defaults
    ConfigReset,
    /// Clear the cache to fetch fresh data
    CacheClear,
}

impl Command {
    /// Category and page-size override for the browsing commands
    pub fn browse_target(&self) -> Option<(Category, Option<usize>)> {
        match self {
            Command::Top { limit } => Some((Category::Top, *limit)),
            Command::New { limit } => Some((Category::New, *limit)),
            Command::Best { limit } => Some((Category::Best, *limit)),
            _ => None,
        }
    }
}

/// Turns a `config-set` value into JSON
///
/// `true/yes/y/1` and `false/no/n/0` become booleans, other digit strings
/// become integers, everything else stays a string.
pub fn parse_config_value(raw: &str) -> Value {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Value::Bool(true),
        "false" | "no" | "n" | "0" => Value::Bool(false),
        digits if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => digits
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        _ => Value::String(raw.to_string()),
    }
}
