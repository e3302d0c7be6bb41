//! Service Container - Centralized access to the resource services.
//!
//! Handlers depend on the service traits only; the container wires the
//! concrete managers to a single document store.

use std::sync::Arc;

use super::{
    BudgetManager, BudgetService, ProjectManager, ProjectService, RevenueManager, RevenueService,
    SubscriptionModelManager, SubscriptionModelService, SummaryManager, SummaryService,
    TrackingManager, TrackingService,
};
use crate::infra::DocumentStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn budget(&self) -> Arc<dyn BudgetService>;

    fn projects(&self) -> Arc<dyn ProjectService>;

    fn tracking(&self) -> Arc<dyn TrackingService>;

    fn revenue(&self) -> Arc<dyn RevenueService>;

    fn subscription_models(&self) -> Arc<dyn SubscriptionModelService>;

    fn summary(&self) -> Arc<dyn SummaryService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    budget: Arc<dyn BudgetService>,
    projects: Arc<dyn ProjectService>,
    tracking: Arc<dyn TrackingService>,
    revenue: Arc<dyn RevenueService>,
    subscription_models: Arc<dyn SubscriptionModelService>,
    summary: Arc<dyn SummaryService>,
}

impl Services {
    /// Build every service over the same store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            budget: Arc::new(BudgetManager::new(store.clone())),
            projects: Arc::new(ProjectManager::new(store.clone())),
            tracking: Arc::new(TrackingManager::new(store.clone())),
            revenue: Arc::new(RevenueManager::new(store.clone())),
            subscription_models: Arc::new(SubscriptionModelManager::new(store.clone())),
            summary: Arc::new(SummaryManager::new(store)),
        }
    }
}

impl ServiceContainer for Services {
    fn budget(&self) -> Arc<dyn BudgetService> {
        self.budget.clone()
    }

    fn projects(&self) -> Arc<dyn ProjectService> {
        self.projects.clone()
    }

    fn tracking(&self) -> Arc<dyn TrackingService> {
        self.tracking.clone()
    }

    fn revenue(&self) -> Arc<dyn RevenueService> {
        self.revenue.clone()
    }

    fn subscription_models(&self) -> Arc<dyn SubscriptionModelService> {
        self.subscription_models.clone()
    }

    fn summary(&self) -> Arc<dyn SummaryService> {
        self.summary.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_services_share_one_store() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let services = Services::new(store.clone());

        services
            .summary()
            .add_item(json!({"id": "1", "item": "Revenue"}))
            .await
            .unwrap();

        let again = Services::new(store);
        assert_eq!(again.summary().items().await.unwrap().len(), 1);
        assert!(again.budget().sections().await.unwrap().is_empty());
    }
}
