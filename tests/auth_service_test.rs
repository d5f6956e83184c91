//! Authentication service integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use shop_admin::config::Config;
use shop_admin::domain::{Password, User};
use shop_admin::errors::{AppError, AppResult};
use shop_admin::infra::{OrderRepository, TransactionContext, UnitOfWork, UserRepository};
use shop_admin::services::{AuthService, Authenticator};

#[derive(Default)]
struct InMemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, email: String, password_hash: String, name: String) -> AppResult<User> {
        let user = User::new(Uuid::new_v4(), email, password_hash, name);
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        _id: Uuid,
        _name: Option<String>,
        _password_hash: Option<String>,
    ) -> AppResult<User> {
        unimplemented!("not used by auth tests")
    }
}

struct TestUnitOfWork {
    users: Arc<InMemoryUsers>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        unimplemented!("orders not used by auth tests")
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

fn service(store: Arc<InMemoryUsers>) -> Authenticator<TestUnitOfWork> {
    Authenticator::new(Arc::new(TestUnitOfWork { users: store }), Config::from_env())
}

#[tokio::test]
async fn test_register_hashes_the_password() {
    let store = Arc::new(InMemoryUsers::default());

    let user = service(store)
        .register(
            "test@example.com".to_string(),
            "P@ssword123!".to_string(),
            "Test User".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(user.name, "Test User");
    assert_ne!(user.password_hash, "P@ssword123!");
    assert!(Password::from_hash(user.password_hash).verify("P@ssword123!"));
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let store = Arc::new(InMemoryUsers::default());
    let auth = service(store);

    auth.register(
        "test@example.com".to_string(),
        "P@ssword123!".to_string(),
        "First".to_string(),
    )
    .await
    .unwrap();

    let err = auth
        .register(
            "test@example.com".to_string(),
            "P@ssword123!".to_string(),
            "Second".to_string(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let store = Arc::new(InMemoryUsers::default());

    let err = service(store)
        .register(
            "test@example.com".to_string(),
            "Pass1!".to_string(),
            "Test User".to_string(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_login_round_trip() {
    let store = Arc::new(InMemoryUsers::default());
    let auth = service(store);

    auth.register(
        "test@example.com".to_string(),
        "P@ssword123!".to_string(),
        "Test User".to_string(),
    )
    .await
    .unwrap();

    let token = auth
        .login("test@example.com".to_string(), "P@ssword123!".to_string())
        .await
        .unwrap();

    assert_eq!(token.token_type, "Bearer");

    let claims = auth.verify_token(&token.access_token).unwrap();
    assert_eq!(claims.email, "test@example.com");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let store = Arc::new(InMemoryUsers::default());
    let auth = service(store);

    auth.register(
        "test@example.com".to_string(),
        "P@ssword123!".to_string(),
        "Test User".to_string(),
    )
    .await
    .unwrap();

    let err = auth
        .login("test@example.com".to_string(), "wrong".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_rejects_unknown_email() {
    let store = Arc::new(InMemoryUsers::default());

    let err = service(store)
        .login("nobody@example.com".to_string(), "whatever".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_verify_token_rejects_garbage() {
    let store = Arc::new(InMemoryUsers::default());

    let err = service(store).verify_token("not-a-jwt").unwrap_err();
    assert!(matches!(err, AppError::Jwt(_)));
}
