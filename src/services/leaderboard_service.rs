//! Read-only scoring service: ranks every card by marked non-free cells.

use thiserror::Error;

use crate::models::LeaderboardEntry;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for LeaderboardError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for LeaderboardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait LeaderboardService: Send + Sync {
    /// Every card with its filled count, descending by count, ties broken
    /// by ascending username. Pure aggregation, no mutation.
    async fn rank_cards(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}
