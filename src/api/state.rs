//! Application state - Dependency injection container.
//!
//! Provides centralized access to the resource services and the store.

use std::sync::Arc;

use crate::infra::{DocumentStore, MemoryStore};
use crate::services::{
    BudgetService, ProjectService, RevenueService, ServiceContainer, Services,
    SubscriptionModelService, SummaryService, TrackingService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub budget_service: Arc<dyn BudgetService>,
    pub project_service: Arc<dyn ProjectService>,
    pub tracking_service: Arc<dyn TrackingService>,
    pub revenue_service: Arc<dyn RevenueService>,
    pub subscription_model_service: Arc<dyn SubscriptionModelService>,
    pub summary_service: Arc<dyn SummaryService>,
    /// Backing store, pinged by the health check
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Create application state with every service built over `store`.
    ///
    /// This is the recommended way to create AppState.
    pub fn from_store(store: Arc<dyn DocumentStore>) -> Self {
        let container = Services::new(store.clone());
        Self::new(&container, store)
    }

    /// State over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    /// Create application state from any service container.
    pub fn new(container: &dyn ServiceContainer, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            budget_service: container.budget(),
            project_service: container.projects(),
            tracking_service: container.tracking(),
            revenue_service: container.revenue(),
            subscription_model_service: container.subscription_models(),
            summary_service: container.summary(),
            store,
        }
    }
}
