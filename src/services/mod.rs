//! Application services layer - Use cases over the document store.
//!
//! Each resource group has a service trait and a `*Manager` implementation
//! holding the shared `DocumentStore`. Writes go through
//! `document_ops::modify`, which retries on version conflicts.

mod budget_service;
pub mod container;
pub mod document_ops;
mod project_service;
mod revenue_service;
mod subscription_model_service;
mod summary_service;
mod tracking_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use budget_service::{BudgetManager, BudgetService};
pub use project_service::{ProjectManager, ProjectService};
pub use revenue_service::{RevenueManager, RevenueService};
pub use subscription_model_service::{SubscriptionModelManager, SubscriptionModelService};
pub use summary_service::{SummaryManager, SummaryService};
pub use tracking_service::{TrackingManager, TrackingService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
