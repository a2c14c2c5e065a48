use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::validation::validate_card_id;
use super::{ApiError, ApiResponse, AppState, CardSummaryDto, MessageResponse};
use crate::services::AdminError;

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidBoardSize(e) => Self::validation(e.to_string()),
            AdminError::CardNotFound(id) => Self::not_found("Card", id),
            AdminError::Database(msg) => Self::DatabaseError(msg),
            AdminError::Internal(msg) => Self::internal(msg),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SettingsDto {
    pub board_size: i32,
    pub allowed_sizes: Vec<i32>,
    pub cards: Vec<CardSummaryDto>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeBoardSizeRequest {
    pub board_size: i32,
}

#[derive(Debug, Serialize)]
pub struct ResetAllResponse {
    pub deleted: u64,
}

/// GET /admin/settings
/// Current board size, the allowed sizes, and every card with its owner.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SettingsDto>>, ApiError> {
    let settings = state.admin().settings().await?;

    Ok(Json(ApiResponse::success(SettingsDto {
        board_size: settings.board_size,
        allowed_sizes: settings.allowed_sizes,
        cards: settings
            .cards
            .into_iter()
            .map(CardSummaryDto::from)
            .collect(),
    })))
}

/// PUT /admin/settings/board-size
/// Change the board size used for new cards. Existing cards keep the
/// size they were created with.
pub async fn change_board_size(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChangeBoardSizeRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let size = state.admin().change_board_size(payload.board_size).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Board size set to {size}"),
    })))
}

/// POST /admin/reset
/// Delete every card so players can start over. Irreversible.
pub async fn reset_all_cards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ResetAllResponse>>, ApiError> {
    let deleted = state.admin().reset_all_cards().await?;

    Ok(Json(ApiResponse::success(ResetAllResponse { deleted })))
}

/// POST /admin/cards/{id}/reset
/// Delete one player's card by id.
pub async fn reset_card(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let card_id = validate_card_id(card_id)?;

    state.admin().reset_card(card_id).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Card #{card_id} has been reset"),
    })))
}
