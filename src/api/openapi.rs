//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, order_handler, profile_handler};
use crate::domain::order::{OrderDetailResponse, OrderItemResponse, OrderResponse};
use crate::domain::{OrderStatus, ProfileForm, ProfileUpdateRequest, UpdateOrder, UserResponse, UserRole};
use crate::services::TokenResponse;

/// OpenAPI documentation for the Shop Admin API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop Admin API",
        version = "0.1.0",
        description = "Administrative back-office API: orders, line items, account self-service",
        contact(name = "API Support", email = "support@example.com")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Profile endpoints
        profile_handler::get_profile,
        profile_handler::update_profile,
        // Order endpoints
        order_handler::list_orders,
        order_handler::get_order,
        order_handler::list_items,
        order_handler::update_order,
        order_handler::delete_order,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            OrderStatus,
            OrderResponse,
            OrderItemResponse,
            OrderDetailResponse,
            UpdateOrder,
            ProfileForm,
            ProfileUpdateRequest,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Profile", description = "Account self-service"),
        (name = "Orders", description = "Order management operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
