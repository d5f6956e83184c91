//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and use the Unit of Work pattern for
//! repository access and transaction management.

mod auth_service;
pub mod container;
mod order_service;
mod profile_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use order_service::{OrderManager, OrderService};
pub use profile_service::{ProfileManager, ProfileService, ProfileUpdated};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
