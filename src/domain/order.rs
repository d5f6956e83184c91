//! Order and order line item domain entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    New,
    Processing,
    Paid,
    Shipped,
    Delivered,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// All statuses, in lifecycle order
    pub const ALL: &'static [OrderStatus] = &[
        OrderStatus::New,
        OrderStatus::Processing,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Processing => "processing",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Parse a stored/submitted status value
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order domain entity
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_total: Decimal,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line item.
///
/// Line items are a read-only projection in the back office; they are
/// created with the order and never edited independently.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub sub_total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Order update data transfer object.
///
/// Customer and order total are not editable in the back office;
/// only status and addresses can change.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateOrder {
    /// New status value
    #[schema(example = "shipped")]
    pub status: Option<String>,
    /// Shipping address text
    pub shipping_address: Option<String>,
    /// Billing address text
    pub billing_address: Option<String>,
}

/// Order response for list/detail endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    /// Customer identifier
    pub user_id: Uuid,
    #[schema(value_type = String, example = "99.95")]
    pub order_total: Decimal,
    #[schema(example = "processing")]
    pub status: String,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    /// Order date
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            order_total: order.order_total,
            status: order.status.to_string(),
            shipping_address: order.shipping_address,
            billing_address: order.billing_address,
            created_at: order.created_at,
        }
    }
}

/// Line item response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    #[schema(example = "Blue T-Shirt")]
    pub product_name: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "19.99")]
    pub price_per_unit: Decimal,
    #[schema(value_type = String, example = "39.98")]
    pub sub_total: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            product_name: item.product_name,
            quantity: item.quantity,
            price_per_unit: item.price_per_unit,
            sub_total: item.sub_total,
        }
    }
}

/// Order detail including its line items
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetailResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(*status));
        }
    }

    #[test]
    fn test_status_rejects_unknown() {
        assert_eq!(OrderStatus::parse("on-hold"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }
}
