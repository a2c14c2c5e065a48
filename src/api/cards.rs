use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_cell_id, validate_username};
use super::{ApiError, ApiResponse, AppState, CardDto, CardViewDto, CellDto};
use crate::services::{CardError, CellEntry};

impl From<CardError> for ApiError {
    fn from(err: CardError) -> Self {
        match err {
            CardError::AlreadyExists => Self::conflict("You already have a card"),
            CardError::CardNotFound => Self::card_not_found(),
            CardError::CellNotAccessible => Self::NotFound("Cell not accessible".to_string()),
            CardError::Validation(msg) => Self::validation(msg),
            // Integrity violation; already logged by the service.
            CardError::IncompleteGrid(e) => Self::internal(e.to_string()),
            CardError::Database(msg) => Self::DatabaseError(msg),
            CardError::Internal(msg) => Self::internal(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub cells: Vec<CellEntry>,
}

/// POST /cards
/// Create the caller's card from one text per non-center position. The
/// board size comes from the site settings, not the request.
pub async fn create_card(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<Json<ApiResponse<CardDto>>, ApiError> {
    let card = state.cards().create_card(user.id, payload.cells).await?;

    Ok(Json(ApiResponse::success(card.into())))
}

/// GET /cards/mine
/// The caller's own card with its grid.
pub async fn get_my_card(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<CardViewDto>>, ApiError> {
    let view = state.cards().card_for_user(user.id).await?;

    Ok(Json(ApiResponse::success(view.into())))
}

/// POST /cards/cells/{id}/mark
/// Mark a cell on the caller's card. Marking is one-way: already-marked
/// and free cells come back unchanged.
pub async fn mark_cell(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(cell_id): Path<i32>,
) -> Result<Json<ApiResponse<CellDto>>, ApiError> {
    let cell_id = validate_cell_id(cell_id)?;

    let cell = state.cards().mark_cell(user.id, cell_id).await?;

    Ok(Json(ApiResponse::success(cell.into())))
}

/// GET /cards/{username}
/// Read-only card view for any player.
pub async fn public_card(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<CardViewDto>>, ApiError> {
    let username = validate_username(&username)?;

    let view = state.cards().card_for_username(username).await?;

    Ok(Json(ApiResponse::success(view.into())))
}
