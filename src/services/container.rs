//! Service Container - centralized service wiring and access.

use std::sync::Arc;

use super::{AuthService, OrderService, ProfileService};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get profile service
    fn profiles(&self) -> Arc<dyn ProfileService>;

    /// Get order service
    fn orders(&self) -> Arc<dyn OrderService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    profile_service: Arc<dyn ProfileService>,
    order_service: Arc<dyn OrderService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        profile_service: Arc<dyn ProfileService>,
        order_service: Arc<dyn OrderService>,
    ) -> Self {
        Self {
            auth_service,
            profile_service,
            order_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{Authenticator, OrderManager, ProfileManager};

        let uow = Arc::new(Persistence::new(db));
        let profile_service = Arc::new(ProfileManager::new(
            uow.clone(),
            config.password_policy.clone(),
        ));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let order_service = Arc::new(OrderManager::new(uow));

        Self {
            auth_service,
            profile_service,
            order_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.profile_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }
}
