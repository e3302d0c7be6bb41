//! Finance API - CRUD service for budgets, projects, project tracking,
//! subscription revenue, subscription models and the financial summary.
//!
//! Every record lives in one JSON document store. Singleton resources
//! (budget, tracking sheet, summary) are one document each; projects,
//! revenue lines and subscription models are one document per record.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **services**: Use cases over the document store
//! - **infra**: Database, migrations and document stores
//! - **api**: HTTP handlers, extractors and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! Domain records and their rules live in the `domain` crate.
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Start without a database
//! cargo run -- serve --in-memory
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use infra::{DocumentStore, MemoryStore};
