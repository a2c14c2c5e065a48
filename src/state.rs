use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::models::BoardSize;
use crate::services::{
    AdminService, AuthService, CardService, LeaderboardService, SeaOrmAdminService,
    SeaOrmAuthService, SeaOrmCardService, SeaOrmLeaderboardService,
};

/// Everything the request handlers share: configuration, the store and
/// the domain services composed over it.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub card_service: Arc<dyn CardService>,

    pub leaderboard_service: Arc<dyn LeaderboardService>,

    pub admin_service: Arc<dyn AdminService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let default_size = BoardSize::try_from(config.game.default_board_size)
            .map_err(anyhow::Error::new)?;
        store.init_site_config(default_size).await?;

        let config_arc = Arc::new(RwLock::new(config));

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config_arc.clone()))
            as Arc<dyn AuthService>;
        let card_service = Arc::new(SeaOrmCardService::new(store.clone())) as Arc<dyn CardService>;
        let leaderboard_service = Arc::new(SeaOrmLeaderboardService::new(store.clone()))
            as Arc<dyn LeaderboardService>;
        let admin_service =
            Arc::new(SeaOrmAdminService::new(store.clone())) as Arc<dyn AdminService>;

        Ok(Self {
            config: config_arc,
            store,
            auth_service,
            card_service,
            leaderboard_service,
            admin_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
