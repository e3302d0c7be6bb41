//! Domain layer - Business records and the rules that govern them.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! record shapes, input coercion (dates, numbers) and the merge rules used
//! when a request body is applied to a stored record.

pub mod budget;
pub mod constants;
pub mod dates;
pub mod error;
pub mod fields;
pub mod numbers;
pub mod project;
pub mod subscription;
pub mod summary;
pub mod tracking;

pub use budget::{BudgetDocument, BudgetItem, BudgetSection};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use fields::Keyed;
pub use project::{Project, Task};
pub use subscription::{resolve_annual_revenue, SubscriptionModel, SubscriptionRevenue};
pub use summary::{SummaryDocument, SummaryItem};
pub use tracking::{parse_row_key, RowAction, TrackingDocument, TrackingItem};
