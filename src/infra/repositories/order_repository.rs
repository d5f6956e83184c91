//! Order repository - persistence for orders and their line items.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::order::{ActiveModel, Column, Entity as OrderEntity};
use super::entities::order_item::{Column as ItemColumn, Entity as ItemEntity};
use crate::domain::{Order, OrderItem, OrderStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Order persistence operations.
///
/// Line items have no independent mutation surface; they live and die
/// with their order.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// List orders newest-first, optionally filtered by status
    async fn list(
        &self,
        status: Option<OrderStatus>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Find order by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    /// List the line items of an order
    async fn items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>>;

    /// Update an order's status and/or addresses.
    ///
    /// `None` leaves a column untouched.
    async fn update(
        &self,
        id: Uuid,
        status: Option<OrderStatus>,
        shipping_address: Option<String>,
        billing_address: Option<String>,
    ) -> AppResult<Order>;
}

/// SeaORM-backed implementation of [`OrderRepository`]
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn list(
        &self,
        status: Option<OrderStatus>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let mut query = OrderEntity::find().order_by_desc(Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }

        let paginator = query.paginate(&self.db, pagination.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Order::from).collect(), total))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let result = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Order::from))
    }

    async fn items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        let models = ItemEntity::find()
            .filter(ItemColumn::OrderId.eq(order_id))
            .order_by_asc(ItemColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(OrderItem::from).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        status: Option<OrderStatus>,
        shipping_address: Option<String>,
        billing_address: Option<String>,
    ) -> AppResult<Order> {
        let active_model = ActiveModel {
            id: Set(id),
            status: status.map(|s| Set(s.as_str().to_string())).unwrap_or(NotSet),
            shipping_address: shipping_address.map(|a| Set(Some(a))).unwrap_or(NotSet),
            billing_address: billing_address.map(|a| Set(Some(a))).unwrap_or(NotSet),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => AppError::NotFound,
            other => AppError::from(other),
        })?;

        Ok(Order::from(model))
    }
}
