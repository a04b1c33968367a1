//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `seed` - Bootstrap roles and the first master admin

pub mod args;

pub use args::{Cli, Commands};
