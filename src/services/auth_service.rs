//! Domain service for authentication and account management.
//!
//! Handles signup, login and API key verification. The rest of the system
//! trusts the identity this service resolves.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Username is taken")]
    UsernameTaken,

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Resolved caller identity.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub is_superuser: bool,
    pub created_at: String,
}

/// Result of signup or login: who you are plus the API key for
/// programmatic access.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub username: String,
    pub api_key: String,
    pub is_superuser: bool,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a regular account and returns its login result.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] when the name is in use,
    /// including when two signups race on the unique username column.
    async fn signup(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Verifies credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Verifies an API key and returns the associated identity if valid.
    async fn verify_api_key(&self, api_key: &str) -> Result<Option<UserInfo>, AuthError>;

    /// Resolves a username to its identity.
    async fn user_info(&self, username: &str) -> Result<UserInfo, AuthError>;

    /// Replaces the user's API key and returns the new one.
    async fn regenerate_api_key(&self, username: &str) -> Result<String, AuthError>;
}
