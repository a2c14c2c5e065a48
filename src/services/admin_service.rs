//! Admin control service: board size reconfiguration and card resets.
//!
//! Exposed only to superusers; the route layer enforces that before any
//! of these operations run.

use serde::Serialize;
use thiserror::Error;

use crate::models::{BoardSize, CardSummary, InvalidBoardSize};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    InvalidBoardSize(#[from] InvalidBoardSize),

    #[error("card not found: {0}")]
    CardNotFound(i32),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AdminError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AdminError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Current game settings plus every existing card, for the admin screen.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSettings {
    pub board_size: i32,
    pub allowed_sizes: Vec<i32>,
    pub cards: Vec<CardSummary>,
}

#[async_trait::async_trait]
pub trait AdminService: Send + Sync {
    async fn settings(&self) -> Result<AdminSettings, AdminError>;

    /// Persists a new site-wide board size for future cards.
    ///
    /// # Errors
    ///
    /// [`AdminError::InvalidBoardSize`] for sizes outside {5, 7, 9}; the
    /// stored value is left unchanged. Existing cards always keep their
    /// creation-time size.
    async fn change_board_size(&self, new_size: i32) -> Result<BoardSize, AdminError>;

    /// Deletes one card and its cells.
    ///
    /// # Errors
    ///
    /// [`AdminError::CardNotFound`] when no card has that id.
    async fn reset_card(&self, card_id: i32) -> Result<(), AdminError>;

    /// Deletes every card. Returns how many were removed. Irreversible.
    async fn reset_all_cards(&self) -> Result<u64, AdminError>;
}
