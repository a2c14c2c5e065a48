//! Domain service for bingo cards: creation, lookup and cell marking.

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Card, Cell, Grid, GridError};

/// Longest allowed cell caption.
pub const MAX_CELL_TEXT_LEN: usize = 100;

/// Text supplied for one non-center position at card creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CellEntry {
    pub row: i32,
    pub col: i32,
    pub text: String,
}

/// Errors specific to card operations.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("card already exists")]
    AlreadyExists,

    #[error("card not found")]
    CardNotFound,

    /// Covers both "no such cell" and "cell on someone else's card";
    /// callers see a single not-accessible outcome.
    #[error("cell not accessible")]
    CellNotAccessible,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("stored grid is corrupt: {0}")]
    IncompleteGrid(#[from] GridError),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CardError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A card together with its cells arranged as a 2D grid.
#[derive(Debug, Clone)]
pub struct CardView {
    pub card: Card,
    pub grid: Grid,
}

/// Domain service trait for card play.
#[async_trait::async_trait]
pub trait CardService: Send + Sync {
    /// Creates the caller's card from the site-wide board size and one
    /// text per non-center position, atomically with all its cells.
    ///
    /// # Errors
    ///
    /// [`CardError::AlreadyExists`] if the user already has a card,
    /// [`CardError::Validation`] listing every missing or invalid position.
    async fn create_card(&self, user_id: i32, entries: Vec<CellEntry>) -> Result<Card, CardError>;

    /// The caller's own card with its grid.
    async fn card_for_user(&self, user_id: i32) -> Result<CardView, CardError>;

    /// Read-only card view for any player, looked up by username.
    async fn card_for_username(&self, username: &str) -> Result<CardView, CardError>;

    /// Marks a cell on the caller's card. Idempotent: already-marked and
    /// free cells are left as they are. There is no unmark.
    async fn mark_cell(&self, user_id: i32, cell_id: i32) -> Result<Cell, CardError>;
}
