//! Domain service for registration, login and account lookups.

use crate::domain::{Role, UserId};
use crate::services::presentation::DisplayTime;
use serde::Serialize;
use thiserror::Error;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),

    #[error("username taken")]
    UsernameTaken,

    #[error("invalid username and/or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub created_at: DisplayTime,
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates a `member` account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Validation`] for a blank username or password or a
    /// confirmation mismatch, and [`AccountError::UsernameTaken`] for duplicates.
    async fn register(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<UserInfo, AccountError>;

    /// Verifies credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<UserInfo, AccountError>;

    /// Loads the account behind a session identity, `None` if it no longer exists.
    async fn current_user(&self, id: UserId) -> Result<Option<UserInfo>, AccountError>;

    /// Fresh role lookup against the store. Never cached.
    async fn role_of(&self, id: UserId) -> Result<Option<Role>, AccountError>;

    /// Creates an `admin` account. Only reachable from the command line.
    async fn create_admin(&self, username: &str, password: &str) -> Result<UserInfo, AccountError>;
}
