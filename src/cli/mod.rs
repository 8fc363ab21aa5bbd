//! CLI module
//!
//! Command-line interface for running scrapes.
//!
//! # Commands
//!
//! - `scrape` - Scrape every review of one business and print the result
//! - `serve` - Start HTTP server mode
//! - `config` - Print the effective configuration

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve, ServerConfig};
