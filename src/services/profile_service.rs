//! Profile service - self-service account updates.
//!
//! Orchestrates the one stateful workflow in the back office: the
//! authenticated principal edits their own name and/or password. All
//! validation runs up front and collects every failure; the mutation is
//! a single two-column write applied only when the whole submission is
//! valid.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::profile::{validate_update, ProfileForm, ProfileUpdateRequest};
use crate::domain::{Password, PasswordPolicy, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Outcome of a successful profile update.
///
/// `form` is the reset transient state: password fields cleared, name
/// and email re-populated from the persisted user.
#[derive(Debug, Clone)]
pub struct ProfileUpdated {
    pub user: User,
    pub form: ProfileForm,
    pub name_changed: bool,
    pub password_changed: bool,
}

/// Profile service trait for dependency injection.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Current form state for the principal (password fields empty)
    async fn get_profile(&self, principal_id: Uuid) -> AppResult<ProfileForm>;

    /// Validate and apply a profile edit for the principal.
    ///
    /// Field-scoped failures come back as
    /// [`AppError::ProfileValidation`] carrying the full collection.
    async fn update_profile(
        &self,
        principal_id: Uuid,
        request: ProfileUpdateRequest,
    ) -> AppResult<ProfileUpdated>;
}

/// Concrete implementation of ProfileService using Unit of Work.
pub struct ProfileManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: PasswordPolicy,
}

impl<U: UnitOfWork> ProfileManager<U> {
    /// Create new profile service instance
    pub fn new(uow: Arc<U>, policy: PasswordPolicy) -> Self {
        Self { uow, policy }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProfileService for ProfileManager<U> {
    async fn get_profile(&self, principal_id: Uuid) -> AppResult<ProfileForm> {
        let user = self
            .uow
            .users()
            .find_by_id(principal_id)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(ProfileForm::from_user(&user))
    }

    async fn update_profile(
        &self,
        principal_id: Uuid,
        request: ProfileUpdateRequest,
    ) -> AppResult<ProfileUpdated> {
        let principal = self
            .uow
            .users()
            .find_by_id(principal_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Either a fully-validated change set or the complete error
        // collection; nothing is written on the error path.
        let changes = validate_update(&principal, &request, &self.policy)?;

        let name_changed = changes.name.is_some();
        let password_changed = changes.new_password.is_some();

        // Saving the already-stored state issues no write
        if changes.is_noop() {
            tracing::info!(user_id = %principal.id, "Profile update was a no-op");
            let form = ProfileForm::from_user(&principal);
            return Ok(ProfileUpdated {
                user: principal,
                form,
                name_changed,
                password_changed,
            });
        }

        let password_hash = match changes.new_password {
            Some(plain) => Some(Password::new(&plain)?.into_string()),
            None => None,
        };

        // One write carries both columns
        let user = self
            .uow
            .users()
            .update_profile(principal.id, changes.name, password_hash)
            .await?;

        tracing::info!(
            user_id = %user.id,
            name_changed,
            password_changed,
            "Profile updated"
        );

        let form = ProfileForm::from_user(&user);
        Ok(ProfileUpdated {
            user,
            form,
            name_changed,
            password_changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{ErrorKind, ProfileField};
    use crate::domain::UserRole;
    use crate::infra::{MockUserRepository, OrderRepository, TransactionContext, UserRepository};
    use chrono::Utc;
    use mockall::predicate::eq;

    struct TestUnitOfWork {
        user_repo: Arc<MockUserRepository>,
    }

    impl TestUnitOfWork {
        fn new(user_repo: MockUserRepository) -> Self {
            Self {
                user_repo: Arc::new(user_repo),
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.user_repo.clone()
        }

        fn orders(&self) -> Arc<dyn OrderRepository> {
            unimplemented!("orders not used by profile tests")
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

    fn stored_user(id: Uuid, password: &str) -> User {
        User {
            id,
            email: "staff@example.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            name: "Old Name".to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn name_only_request(name: &str) -> ProfileUpdateRequest {
        ProfileUpdateRequest {
            name: name.to_string(),
            current_password: String::new(),
            new_password: String::new(),
            new_password_confirmation: String::new(),
        }
    }

    #[tokio::test]
    async fn test_name_update_writes_name_only() {
        let user_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();

        let loaded = stored_user(user_id, "old-password");
        let persisted = User {
            name: "New Name".to_string(),
            ..loaded.clone()
        };
        repo.expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_update_profile()
            .withf(move |id, name, hash| {
                *id == user_id && name.as_deref() == Some("New Name") && hash.is_none()
            })
            .returning(move |_, _, _| Ok(persisted.clone()));

        let service = ProfileManager::new(
            Arc::new(TestUnitOfWork::new(repo)),
            PasswordPolicy::default(),
        );
        let result = service
            .update_profile(user_id, name_only_request("New Name"))
            .await
            .unwrap();

        assert!(result.name_changed);
        assert!(!result.password_changed);
        assert_eq!(result.form.name, "New Name");
        assert!(result.form.current_password.is_empty());
    }

    #[tokio::test]
    async fn test_validation_failure_never_touches_the_store() {
        let user_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();

        let loaded = stored_user(user_id, "old-password");
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_update_profile().times(0);

        let service = ProfileManager::new(
            Arc::new(TestUnitOfWork::new(repo)),
            PasswordPolicy::default(),
        );

        let mut request = name_only_request("New Name");
        request.current_password = "wrong".to_string();
        request.new_password = "P@ssword123!".to_string();
        request.new_password_confirmation = "P@ssword123!".to_string();

        let err = service.update_profile(user_id, request).await.unwrap_err();
        match err {
            AppError::ProfileValidation(errors) => {
                assert!(errors.contains(ProfileField::CurrentPassword, ErrorKind::Invalid));
            }
            other => panic!("expected ProfileValidation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_identical_name_skips_the_write() {
        let user_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();

        let loaded = stored_user(user_id, "old-password");
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_update_profile().times(0);

        let service = ProfileManager::new(
            Arc::new(TestUnitOfWork::new(repo)),
            PasswordPolicy::default(),
        );
        let result = service
            .update_profile(user_id, name_only_request("Old Name"))
            .await
            .unwrap();

        assert!(!result.name_changed);
        assert!(!result.password_changed);
    }

    #[tokio::test]
    async fn test_unknown_principal_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = ProfileManager::new(
            Arc::new(TestUnitOfWork::new(repo)),
            PasswordPolicy::default(),
        );
        let err = service
            .update_profile(Uuid::new_v4(), name_only_request("Name"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }
}
