//! Service report backend for field maintenance of medical equipment.
//!
//! Three roles share one API: a MASTER_ADMIN provisions admins, admins
//! provision technicians and open service reports, and technicians move
//! their assigned reports through `open -> progress -> done`. Every status
//! change is recorded in an append-only log.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Roles, accounts, reports and the authorization policy
//! - **services**: Application use cases
//! - **infra**: Database, migrations, repositories and email
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response envelopes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (migrates and seeds on startup)
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Seed roles and the master admin
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Actor, Password, ReportStatus, Role, ServiceReport, User};
pub use errors::{AppError, AppResult};
