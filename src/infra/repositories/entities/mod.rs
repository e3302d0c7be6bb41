//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod document;

#[allow(unused_imports)]
pub use document::{ActiveModel as DocumentActiveModel, Entity as DocumentEntity, Model as DocumentModel};
