use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, LeaderboardEntryDto};
use crate::services::LeaderboardError;

impl From<LeaderboardError> for ApiError {
    fn from(err: LeaderboardError) -> Self {
        match err {
            LeaderboardError::Database(msg) => Self::DatabaseError(msg),
            LeaderboardError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /leaderboard
/// Every card ranked by filled count, ties broken by username.
pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntryDto>>>, ApiError> {
    let entries = state.leaderboard().rank_cards().await?;

    Ok(Json(ApiResponse::success(
        entries.into_iter().map(LeaderboardEntryDto::from).collect(),
    )))
}
