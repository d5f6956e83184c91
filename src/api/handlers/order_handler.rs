//! Order management handlers (staff only).

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::order::{OrderDetailResponse, OrderItemResponse, OrderResponse};
use crate::domain::UpdateOrder;
use crate::errors::AppResult;
use crate::types::{NoContent, Paginated, PaginationParams};

/// Order list query: pagination plus optional status filter.
///
/// Fields are inlined rather than flattened; the urlencoded
/// deserializer cannot parse numbers through `serde(flatten)`.
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Filter by status value (e.g. "processing")
    pub status: Option<String>,
}

impl ListOrdersQuery {
    fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route(
            "/:id",
            get(get_order).patch(update_order).delete(delete_order),
        )
        .route("/:id/items", get(list_items))
}

/// List orders newest-first with optional status filter
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-indexed)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Status filter")
    ),
    responses(
        (status = 200, description = "Page of orders"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Staff only")
    )
)]
pub async fn list_orders(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> AppResult<Json<Paginated<OrderResponse>>> {
    require_admin(&current_user)?;

    let pagination = query.pagination();
    let page = pagination.page;
    let per_page = pagination.limit();
    let (orders, total) = state
        .order_service
        .list_orders(query.status, pagination)
        .await?;

    let responses: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(Json(Paginated::new(responses, page, per_page, total)))
}

/// Get one order with its line items
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order detail", body = OrderDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Staff only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetailResponse>> {
    require_admin(&current_user)?;

    let (order, items) = state.order_service.get_order(id).await?;
    Ok(Json(OrderDetailResponse {
        order: OrderResponse::from(order),
        items: items.into_iter().map(OrderItemResponse::from).collect(),
    }))
}

/// List the line items of an order
#[utoipa::path(
    get,
    path = "/orders/{id}/items",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Line items", body = Vec<OrderItemResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Staff only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn list_items(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<OrderItemResponse>>> {
    require_admin(&current_user)?;

    let items = state.order_service.list_items(id).await?;
    Ok(Json(items.into_iter().map(OrderItemResponse::from).collect()))
}

/// Update an order's status and/or addresses
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 400, description = "Unknown status value"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Staff only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrder>,
) -> AppResult<Json<OrderResponse>> {
    require_admin(&current_user)?;

    let order = state.order_service.update_order(id, payload).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// Delete an order together with its line items
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Staff only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&current_user)?;

    state.order_service.delete_order(id).await?;
    Ok(NoContent)
}
