//! `SeaORM` implementation of the `LeaderboardService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::models::LeaderboardEntry;
use crate::services::leaderboard_service::{LeaderboardError, LeaderboardService};

pub struct SeaOrmLeaderboardService {
    store: Store,
}

impl SeaOrmLeaderboardService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LeaderboardService for SeaOrmLeaderboardService {
    async fn rank_cards(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.store.rank_cards().await?)
    }
}
