//! `SeaORM` implementation of the `CardService` trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::error;

use crate::db::Store;
use crate::models::{BoardSize, Card, Cell, Grid};
use crate::services::card_service::{
    CardError, CardService, CardView, CellEntry, MAX_CELL_TEXT_LEN,
};

pub struct SeaOrmCardService {
    store: Store,
}

impl SeaOrmCardService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Checks the whole entry set before anything is written: every
    /// non-center position exactly once, nothing out of range or aimed at
    /// the center, every text non-empty and within the length cap.
    fn validate_entries(
        size: BoardSize,
        entries: &[CellEntry],
    ) -> Result<BTreeMap<(i32, i32), String>, CardError> {
        let mut texts = BTreeMap::new();
        let mut problems = Vec::new();

        for entry in entries {
            let (row, col) = (entry.row, entry.col);
            if !size.contains(row, col) {
                problems.push(format!("({row}, {col}) is outside the {size} board"));
                continue;
            }
            if size.is_center(row, col) {
                problems.push(format!("({row}, {col}) is the free cell and takes no text"));
                continue;
            }
            let text = entry.text.trim();
            if text.is_empty() {
                problems.push(format!("({row}, {col}): text is required"));
                continue;
            }
            if text.chars().count() > MAX_CELL_TEXT_LEN {
                problems.push(format!(
                    "({row}, {col}): text is longer than {MAX_CELL_TEXT_LEN} characters"
                ));
                continue;
            }
            if texts.insert((row, col), text.to_string()).is_some() {
                problems.push(format!("({row}, {col}) appears more than once"));
            }
        }

        for row in 0..size.side() {
            for col in 0..size.side() {
                if !size.is_center(row, col) && !texts.contains_key(&(row, col)) {
                    problems.push(format!("missing text for ({row}, {col})"));
                }
            }
        }

        if problems.is_empty() {
            Ok(texts)
        } else {
            Err(CardError::Validation(problems.join("; ")))
        }
    }

    async fn view(&self, card: Card) -> Result<CardView, CardError> {
        let size = BoardSize::try_from(card.board_size)
            .map_err(|e| CardError::Internal(e.to_string()))?;
        let cells = self.store.cells_for_card(card.id).await?;

        let grid = Grid::build(size, cells).inspect_err(|e| {
            error!("Card #{} failed grid integrity check: {e}", card.id);
        })?;

        Ok(CardView { card, grid })
    }
}

#[async_trait]
impl CardService for SeaOrmCardService {
    async fn create_card(&self, user_id: i32, entries: Vec<CellEntry>) -> Result<Card, CardError> {
        if self.store.card_for_user(user_id).await?.is_some() {
            return Err(CardError::AlreadyExists);
        }

        let size = self.store.board_size().await?;
        let texts = Self::validate_entries(size, &entries)?;

        if let Err(e) = self.store.create_card(user_id, size, &texts).await {
            // Two concurrent creations race past the existence check; the
            // unique user_id constraint decides, and the loser sees this.
            if is_unique_violation(&e) {
                return Err(CardError::AlreadyExists);
            }
            return Err(e.into());
        }

        self.store
            .card_for_user(user_id)
            .await?
            .ok_or_else(|| CardError::Internal("card missing right after creation".to_string()))
    }

    async fn card_for_user(&self, user_id: i32) -> Result<CardView, CardError> {
        let card = self
            .store
            .card_for_user(user_id)
            .await?
            .ok_or(CardError::CardNotFound)?;

        self.view(card).await
    }

    async fn card_for_username(&self, username: &str) -> Result<CardView, CardError> {
        let card = self
            .store
            .card_for_username(username)
            .await?
            .ok_or(CardError::CardNotFound)?;

        self.view(card).await
    }

    async fn mark_cell(&self, user_id: i32, cell_id: i32) -> Result<Cell, CardError> {
        self.store
            .mark_cell(user_id, cell_id)
            .await?
            .ok_or(CardError::CellNotAccessible)
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sea_orm::DbErr>()
        .and_then(sea_orm::DbErr::sql_err)
        .is_some_and(|e| matches!(e, sea_orm::SqlErr::UniqueConstraintViolation(_)))
}
