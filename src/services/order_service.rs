//! Order service - back-office order management.
//!
//! Orders are edited, not created, in the back office: staff adjust
//! status and addresses, inspect line items, and remove orders. The
//! customer and order total are read-only.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Order, OrderItem, OrderStatus, UpdateOrder};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// List orders newest-first with optional status filter.
    /// Returns the page of orders and the total match count.
    async fn list_orders(
        &self,
        status: Option<String>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Get one order with its line items
    async fn get_order(&self, id: Uuid) -> AppResult<(Order, Vec<OrderItem>)>;

    /// List the line items of an order
    async fn list_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>>;

    /// Update an order's status and/or addresses
    async fn update_order(&self, id: Uuid, update: UpdateOrder) -> AppResult<Order>;

    /// Delete an order together with its line items
    async fn delete_order(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of OrderService using Unit of Work.
pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    /// Create new order service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Parse a submitted status value or fail with a validation error
fn parse_status(value: &str) -> AppResult<OrderStatus> {
    OrderStatus::parse(value)
        .ok_or_else(|| AppError::validation(format!("Unknown order status: {}", value)))
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn list_orders(
        &self,
        status: Option<String>,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let status = status.as_deref().map(parse_status).transpose()?;
        self.uow.orders().list(status, &pagination).await
    }

    async fn get_order(&self, id: Uuid) -> AppResult<(Order, Vec<OrderItem>)> {
        let order = self
            .uow
            .orders()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;
        let items = self.uow.orders().items(id).await?;

        Ok((order, items))
    }

    async fn list_items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        // Distinguish an empty order from a missing one
        self.uow
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.uow.orders().items(order_id).await
    }

    async fn update_order(&self, id: Uuid, update: UpdateOrder) -> AppResult<Order> {
        let status = update.status.as_deref().map(parse_status).transpose()?;

        let order = self
            .uow
            .orders()
            .update(id, status, update.shipping_address, update.billing_address)
            .await?;

        tracing::info!(order_id = %order.id, status = %order.status, "Order updated");
        Ok(order)
    }

    async fn delete_order(&self, id: Uuid) -> AppResult<()> {
        // Items and order go in one transaction
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let orders = ctx.orders();
                    orders
                        .find_by_id(id)
                        .await?
                        .ok_or(AppError::NotFound)?;
                    let removed = orders.delete_items(id).await?;
                    orders.delete(id).await?;
                    tracing::info!(order_id = %id, items_removed = removed, "Order deleted");
                    Ok(())
                })
            })
            .await
    }
}
