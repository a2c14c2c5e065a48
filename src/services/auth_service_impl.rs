//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;
use crate::db::{Store, User};
use crate::services::auth_service::{AuthError, AuthService, LoginResult, UserInfo};

pub struct SeaOrmAuthService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    fn login_result(user: &User) -> LoginResult {
        LoginResult {
            username: user.username.clone(),
            api_key: user.api_key.clone(),
            is_superuser: user.is_superuser,
        }
    }

    fn user_info_from(user: User) -> UserInfo {
        UserInfo {
            id: user.id,
            username: user.username,
            is_superuser: user.is_superuser,
            created_at: user.created_at,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn signup(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let security = self.config.read().await.security.clone();

        let user = match self.store.create_user(username, password, &security).await {
            Ok(user) => user,
            Err(e) => {
                // Concurrent signups race past the existence check; the
                // unique username column decides.
                if is_unique_violation(&e) {
                    return Err(AuthError::UsernameTaken);
                }
                return Err(e.into());
            }
        };

        info!("New player signed up: {username}");
        Ok(Self::login_result(&user))
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let is_valid = self.store.verify_user_password(username, password).await?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(Self::login_result(&user))
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<UserInfo>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user.map(Self::user_info_from))
    }

    async fn user_info(&self, username: &str) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(Self::user_info_from(user))
    }

    async fn regenerate_api_key(&self, username: &str) -> Result<String, AuthError> {
        let new_key = self.store.regenerate_user_api_key(username).await?;
        info!("API key regenerated for user: {username}");
        Ok(new_key)
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sea_orm::DbErr>()
        .and_then(sea_orm::DbErr::sql_err)
        .is_some_and(|e| matches!(e, sea_orm::SqlErr::UniqueConstraintViolation(_)))
}
