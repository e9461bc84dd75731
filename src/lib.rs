//! hncli library
//!
//! A terminal client for Hacker News. The binary in `main.rs` wires these
//! modules together; integration tests use the CLI and config modules directly.

pub mod app;
pub mod browser;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod comments;
pub mod config;
pub mod data;
pub mod error;
pub mod pagination;
pub mod search;
pub mod terminal;
pub mod text;
pub mod theme;
pub mod ui;
