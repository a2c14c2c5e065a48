use serde::{Deserialize, Serialize};

use crate::models::{Card, CardSummary, Cell, LeaderboardEntry};
use crate::services::CardView;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CellDto {
    pub id: i32,
    pub row: i32,
    pub col: i32,
    pub text: String,
    pub is_free: bool,
    pub is_marked: bool,
}

impl From<Cell> for CellDto {
    fn from(cell: Cell) -> Self {
        Self {
            id: cell.id,
            row: cell.row,
            col: cell.col,
            text: cell.text,
            is_free: cell.is_free,
            is_marked: cell.is_marked,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardDto {
    pub id: i32,
    pub username: String,
    pub board_size: i32,
    pub created_at: String,
    pub marked_count: i64,
}

impl From<Card> for CardDto {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            username: card.username,
            board_size: card.board_size,
            created_at: card.created_at,
            marked_count: card.marked_count,
        }
    }
}

/// A card plus its cells as a row-major 2D grid, ready to render.
#[derive(Debug, Serialize)]
pub struct CardViewDto {
    pub card: CardDto,
    pub grid: Vec<Vec<CellDto>>,
}

impl From<CardView> for CardViewDto {
    fn from(view: CardView) -> Self {
        Self {
            card: view.card.into(),
            grid: view
                .grid
                .into_rows()
                .into_iter()
                .map(|row| row.into_iter().map(CellDto::from).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntryDto {
    pub username: String,
    pub board_size: i32,
    pub filled_count: i64,
}

impl From<LeaderboardEntry> for LeaderboardEntryDto {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            username: entry.username,
            board_size: entry.board_size,
            filled_count: entry.filled_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardSummaryDto {
    pub id: i32,
    pub username: String,
    pub board_size: i32,
    pub created_at: String,
}

impl From<CardSummary> for CardSummaryDto {
    fn from(summary: CardSummary) -> Self {
        Self {
            id: summary.id,
            username: summary.username,
            board_size: summary.board_size,
            created_at: summary.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub api_key: String,
    pub is_superuser: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub username: String,
    pub is_superuser: bool,
    pub created_at: String,
}
