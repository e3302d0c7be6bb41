//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Document stores (PostgreSQL and in-memory)

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{singleton_key, Document, DocumentStore, MemoryStore, PgDocumentStore, SortOrder};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockDocumentStore;
