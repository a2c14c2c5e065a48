use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use migrator::DEFAULT_ADMIN_API_KEY;
pub use repositories::user::User;

use crate::config::SecurityConfig;
use crate::models::{BoardSize, Card, CardSummary, Cell, LeaderboardEntry};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn card_repo(&self) -> repositories::card::CardRepository {
        repositories::card::CardRepository::new(self.conn.clone())
    }

    fn site_config_repo(&self) -> repositories::site_config::SiteConfigRepository {
        repositories::site_config::SiteConfigRepository::new(self.conn.clone())
    }

    // ------------------------------------------------------------------
    // Site config
    // ------------------------------------------------------------------

    /// Explicit initialize-if-absent for the settings singleton; called
    /// once at startup before the service takes traffic.
    pub async fn init_site_config(&self, default_size: BoardSize) -> Result<()> {
        self.site_config_repo().get_or_init(default_size).await?;
        Ok(())
    }

    pub async fn board_size(&self) -> Result<BoardSize> {
        self.site_config_repo().board_size().await
    }

    pub async fn set_board_size(&self, size: BoardSize) -> Result<()> {
        self.site_config_repo().set_board_size(size).await
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo().create(username, password, security).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_user_api_key(&self, username: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(username).await
    }

    // ------------------------------------------------------------------
    // Cards & cells
    // ------------------------------------------------------------------

    pub async fn create_card(
        &self,
        user_id: i32,
        size: BoardSize,
        texts: &BTreeMap<(i32, i32), String>,
    ) -> Result<crate::entities::cards::Model> {
        self.card_repo()
            .create_with_cells(user_id, size, texts)
            .await
    }

    pub async fn card_for_user(&self, user_id: i32) -> Result<Option<Card>> {
        self.card_repo().get_for_user(user_id).await
    }

    pub async fn card_for_username(&self, username: &str) -> Result<Option<Card>> {
        self.card_repo().get_for_username(username).await
    }

    pub async fn cells_for_card(&self, card_id: i32) -> Result<Vec<Cell>> {
        self.card_repo().cells_for(card_id).await
    }

    pub async fn mark_cell(&self, user_id: i32, cell_id: i32) -> Result<Option<Cell>> {
        self.card_repo().mark(user_id, cell_id).await
    }

    pub async fn delete_card(&self, card_id: i32) -> Result<bool> {
        self.card_repo().delete(card_id).await
    }

    pub async fn delete_all_cards(&self) -> Result<u64> {
        self.card_repo().delete_all().await
    }

    pub async fn rank_cards(&self) -> Result<Vec<LeaderboardEntry>> {
        self.card_repo().rank().await
    }

    pub async fn list_cards_with_owners(&self) -> Result<Vec<CardSummary>> {
        self.card_repo().list_with_owners().await
    }
}
