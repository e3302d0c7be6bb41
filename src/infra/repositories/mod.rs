//! Repository layer - Data access abstraction
//!
//! A single document store serves every collection. Records are JSON bodies;
//! typing them is the job of the domain crate.

mod document_repository;
pub(crate) mod entities;
mod memory_store;

pub use document_repository::{singleton_key, Document, DocumentStore, PgDocumentStore, SortOrder};
pub use memory_store::MemoryStore;

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use document_repository::MockDocumentStore;
