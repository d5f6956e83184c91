//! Order service integration tests over an in-memory store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use shop_admin::domain::{Order, OrderItem, OrderStatus, UpdateOrder};
use shop_admin::errors::{AppError, AppResult};
use shop_admin::infra::{OrderRepository, TransactionContext, UnitOfWork, UserRepository};
use shop_admin::services::{OrderManager, OrderService};
use shop_admin::types::PaginationParams;

#[derive(Default)]
struct InMemoryOrders {
    orders: Mutex<HashMap<Uuid, Order>>,
    items: Mutex<HashMap<Uuid, Vec<OrderItem>>>,
}

impl InMemoryOrders {
    fn seed(&self, order: Order, items: Vec<OrderItem>) {
        self.items.lock().unwrap().insert(order.id, items);
        self.orders.lock().unwrap().insert(order.id, order);
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn list(
        &self,
        status: Option<OrderStatus>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let mut orders: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = orders.len() as u64;
        let page: Vec<Order> = orders
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .get(&order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update(
        &self,
        id: Uuid,
        status: Option<OrderStatus>,
        shipping_address: Option<String>,
        billing_address: Option<String>,
    ) -> AppResult<Order> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders.get_mut(&id).ok_or(AppError::NotFound)?;

        if let Some(status) = status {
            order.status = status;
        }
        if let Some(shipping) = shipping_address {
            order.shipping_address = Some(shipping);
        }
        if let Some(billing) = billing_address {
            order.billing_address = Some(billing);
        }
        order.updated_at = Utc::now();

        Ok(order.clone())
    }
}

struct TestUnitOfWork {
    orders: Arc<InMemoryOrders>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        unimplemented!("users not used by order tests")
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn make_order(status: OrderStatus) -> Order {
    Order {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        order_total: Decimal::new(9995, 2),
        status,
        shipping_address: Some("1 Main St".to_string()),
        billing_address: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn make_item(order_id: Uuid, product: &str) -> OrderItem {
    OrderItem {
        id: Uuid::new_v4(),
        order_id,
        product_name: product.to_string(),
        quantity: 2,
        price_per_unit: Decimal::new(1999, 2),
        sub_total: Decimal::new(3998, 2),
        created_at: Utc::now(),
    }
}

fn service(store: Arc<InMemoryOrders>) -> OrderManager<TestUnitOfWork> {
    OrderManager::new(Arc::new(TestUnitOfWork { orders: store }))
}

#[tokio::test]
async fn test_list_orders_filters_by_status() {
    let store = Arc::new(InMemoryOrders::default());
    store.seed(make_order(OrderStatus::New), vec![]);
    store.seed(make_order(OrderStatus::Shipped), vec![]);
    store.seed(make_order(OrderStatus::Shipped), vec![]);

    let (orders, total) = service(store)
        .list_orders(Some("shipped".to_string()), PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(total, 2);
    assert!(orders.iter().all(|o| o.status == OrderStatus::Shipped));
}

#[tokio::test]
async fn test_list_orders_rejects_unknown_status() {
    let store = Arc::new(InMemoryOrders::default());

    let err = service(store)
        .list_orders(Some("on-hold".to_string()), PaginationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_get_order_returns_order_with_items() {
    let store = Arc::new(InMemoryOrders::default());
    let order = make_order(OrderStatus::Paid);
    let order_id = order.id;
    store.seed(
        order,
        vec![make_item(order_id, "Blue T-Shirt"), make_item(order_id, "Mug")],
    );

    let (found, items) = service(store).get_order(order_id).await.unwrap();

    assert_eq!(found.id, order_id);
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_get_missing_order_is_not_found() {
    let store = Arc::new(InMemoryOrders::default());

    let err = service(store).get_order(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_list_items_for_missing_order_is_not_found() {
    let store = Arc::new(InMemoryOrders::default());

    let err = service(store)
        .list_items(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_update_order_status_persists() {
    let store = Arc::new(InMemoryOrders::default());
    let order = make_order(OrderStatus::Processing);
    let order_id = order.id;
    store.seed(order, vec![]);

    let updated = service(store.clone())
        .update_order(
            order_id,
            UpdateOrder {
                status: Some("shipped".to_string()),
                shipping_address: None,
                billing_address: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, OrderStatus::Shipped);
    // Untouched fields survive the update
    assert_eq!(updated.shipping_address.as_deref(), Some("1 Main St"));
}

#[tokio::test]
async fn test_update_order_rejects_unknown_status() {
    let store = Arc::new(InMemoryOrders::default());
    let order = make_order(OrderStatus::New);
    let order_id = order.id;
    store.seed(order.clone(), vec![]);

    let err = service(store.clone())
        .update_order(
            order_id,
            UpdateOrder {
                status: Some("teleported".to_string()),
                shipping_address: None,
                billing_address: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    // Nothing was written
    let (stored, _) = service(store).get_order(order_id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::New);
}

#[tokio::test]
async fn test_pagination_limits_the_page() {
    let store = Arc::new(InMemoryOrders::default());
    for _ in 0..5 {
        store.seed(make_order(OrderStatus::New), vec![]);
    }

    let (orders, total) = service(store)
        .list_orders(
            None,
            PaginationParams {
                page: 1,
                per_page: 2,
            },
        )
        .await
        .unwrap();

    assert_eq!(total, 5);
    assert_eq!(orders.len(), 2);
}
