//! `SeaORM` implementation of the `AccountService` trait.

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::domain::{Role, UserId};
use crate::services::account_service::{AccountError, AccountService, UserInfo};
use crate::services::presentation::normalize_timestamp;
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmAccountService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn to_info(user: User) -> UserInfo {
        UserInfo {
            id: UserId::new(user.id),
            created_at: normalize_timestamp(&user.created_at),
            username: user.username,
            role: user.role,
        }
    }

    fn validate_credentials(&self, username: &str, password: &str) -> Result<(), AccountError> {
        if username.is_empty() {
            return Err(AccountError::Validation("must provide username".to_string()));
        }

        if password.is_empty() {
            return Err(AccountError::Validation("must provide password".to_string()));
        }

        if password.chars().count() < self.security.min_password_length {
            return Err(AccountError::Validation(format!(
                "password must be at least {} characters",
                self.security.min_password_length
            )));
        }

        Ok(())
    }

    async fn create(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<UserInfo, AccountError> {
        let username = username.trim();
        self.validate_credentials(username, password)?;

        let user = self
            .store
            .create_user(username, password, role, &self.security)
            .await?
            .ok_or(AccountError::UsernameTaken)?;

        info!(user_id = user.id, username = %user.username, role = %user.role, "Account created");

        Ok(Self::to_info(user))
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn register(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<UserInfo, AccountError> {
        self.validate_credentials(username.trim(), password)?;

        if password != confirmation {
            return Err(AccountError::Validation("passwords do not match".to_string()));
        }

        self.create(username, password, Role::Member).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<UserInfo, AccountError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AccountError::InvalidCredentials);
        }

        let user = self
            .store
            .verify_user_password(username, password)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        Ok(Self::to_info(user))
    }

    async fn current_user(&self, id: UserId) -> Result<Option<UserInfo>, AccountError> {
        let user = self.store.get_user(id.value()).await?;
        Ok(user.map(Self::to_info))
    }

    async fn role_of(&self, id: UserId) -> Result<Option<Role>, AccountError> {
        Ok(self.store.get_user_role(id.value()).await?)
    }

    async fn create_admin(&self, username: &str, password: &str) -> Result<UserInfo, AccountError> {
        self.create(username, password, Role::Admin).await
    }
}
