//! Shared response types.

mod record;
mod response;

pub use record::Record;
pub use response::{ApiResponse, BulkResponse, Created, DeletedResponse};
