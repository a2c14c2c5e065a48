use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{cards, cells, prelude::*, users};
use crate::models::{BoardSize, Card, CardSummary, Cell, LeaderboardEntry};

pub struct CardRepository {
    conn: DatabaseConnection,
}

impl CardRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_cell(model: cells::Model) -> Cell {
        Cell {
            id: model.id,
            row: model.row,
            col: model.col,
            text: model.text,
            is_free: model.is_free,
            is_marked: model.is_marked,
        }
    }

    /// Create a card and its full cell grid in one transaction.
    ///
    /// `texts` must hold exactly the non-center positions; the caller
    /// (service layer) validates that before calling. The center cell is
    /// written as the pre-marked free cell.
    ///
    /// A unique constraint on `user_id` rejects a second card for the same
    /// user, including under concurrent duplicate creation.
    pub async fn create_with_cells(
        &self,
        user_id: i32,
        size: BoardSize,
        texts: &BTreeMap<(i32, i32), String>,
    ) -> Result<cards::Model> {
        let txn = self.conn.begin().await?;

        let card = cards::ActiveModel {
            user_id: Set(user_id),
            board_size: Set(size.side()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for row in 0..size.side() {
            for col in 0..size.side() {
                let active = if size.is_center(row, col) {
                    cells::ActiveModel {
                        card_id: Set(card.id),
                        row: Set(row),
                        col: Set(col),
                        text: Set("FREE".to_string()),
                        is_free: Set(true),
                        is_marked: Set(true),
                        ..Default::default()
                    }
                } else {
                    let text = texts
                        .get(&(row, col))
                        .ok_or_else(|| anyhow::anyhow!("No text for position ({row}, {col})"))?;
                    cells::ActiveModel {
                        card_id: Set(card.id),
                        row: Set(row),
                        col: Set(col),
                        text: Set(text.clone()),
                        is_free: Set(false),
                        is_marked: Set(false),
                        ..Default::default()
                    }
                };
                active.insert(&txn).await?;
            }
        }

        txn.commit().await?;

        info!("Created {} card #{} for user {}", size, card.id, user_id);
        Ok(card)
    }

    pub async fn get_for_user(&self, user_id: i32) -> Result<Option<Card>> {
        let row = Cards::find()
            .filter(cards::Column::UserId.eq(user_id))
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query card by user")?;

        match row {
            Some((card, owner)) => Ok(Some(self.map_card(card, owner).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_for_username(&self, username: &str) -> Result<Option<Card>> {
        let row = Cards::find()
            .find_also_related(Users)
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query card by username")?;

        match row {
            Some((card, owner)) => Ok(Some(self.map_card(card, owner).await?)),
            None => Ok(None),
        }
    }

    async fn map_card(&self, card: cards::Model, owner: Option<users::Model>) -> Result<Card> {
        let username = owner
            .map(|u| u.username)
            .ok_or_else(|| anyhow::anyhow!("Card #{} has no owning user", card.id))?;
        let marked_count = self.marked_count(card.id).await?;

        Ok(Card {
            id: card.id,
            username,
            board_size: card.board_size,
            created_at: card.created_at,
            marked_count,
        })
    }

    /// Number of marked non-free cells on a card.
    pub async fn marked_count(&self, card_id: i32) -> Result<i64> {
        let count = Cells::find()
            .filter(cells::Column::CardId.eq(card_id))
            .filter(cells::Column::IsMarked.eq(true))
            .filter(cells::Column::IsFree.eq(false))
            .count(&self.conn)
            .await
            .context("Failed to count marked cells")?;

        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    /// All cells of a card, ordered by row then column.
    pub async fn cells_for(&self, card_id: i32) -> Result<Vec<Cell>> {
        let rows = Cells::find()
            .filter(cells::Column::CardId.eq(card_id))
            .order_by_asc(cells::Column::Row)
            .order_by_asc(cells::Column::Col)
            .all(&self.conn)
            .await
            .context("Failed to query cells for card")?;

        Ok(rows.into_iter().map(Self::map_cell).collect())
    }

    /// Mark a cell on the given user's card.
    ///
    /// Returns `None` when the cell does not exist or belongs to someone
    /// else's card (one collapsed "not accessible" outcome). Free and
    /// already-marked cells are returned unchanged; marking is idempotent
    /// and never unmarks.
    pub async fn mark(&self, user_id: i32, cell_id: i32) -> Result<Option<Cell>> {
        let found = Cells::find_by_id(cell_id)
            .find_also_related(Cards)
            .filter(cards::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query cell for marking")?;

        let Some((cell, _card)) = found else {
            return Ok(None);
        };

        if cell.is_free || cell.is_marked {
            return Ok(Some(Self::map_cell(cell)));
        }

        let mut active: cells::ActiveModel = cell.into();
        active.is_marked = Set(true);
        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to mark cell")?;

        info!(
            "Marked cell #{} ({}, {}) for user {}",
            updated.id, updated.row, updated.col, user_id
        );
        Ok(Some(Self::map_cell(updated)))
    }

    /// Delete one card and its cells. Returns false when no such card exists.
    pub async fn delete(&self, card_id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        cells::Entity::delete_many()
            .filter(cells::Column::CardId.eq(card_id))
            .exec(&txn)
            .await?;

        let result = Cards::delete_by_id(card_id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Deleted card #{card_id}");
        }
        Ok(removed)
    }

    /// Delete every card and all cells. Returns the number of cards removed.
    pub async fn delete_all(&self) -> Result<u64> {
        let txn = self.conn.begin().await?;

        cells::Entity::delete_many().exec(&txn).await?;
        let result = cards::Entity::delete_many().exec(&txn).await?;

        txn.commit().await?;

        info!("Deleted all cards ({} removed)", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// Leaderboard: every card with its filled count, descending by count,
    /// ties broken by ascending username.
    pub async fn rank(&self) -> Result<Vec<LeaderboardEntry>> {
        let counts: Vec<(i32, i64)> = Cells::find()
            .select_only()
            .column(cells::Column::CardId)
            .column_as(cells::Column::Id.count(), "filled_count")
            .filter(cells::Column::IsMarked.eq(true))
            .filter(cells::Column::IsFree.eq(false))
            .group_by(cells::Column::CardId)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to aggregate marked cells")?;

        let filled: HashMap<i32, i64> = counts.into_iter().collect();

        let rows = Cards::find()
            .find_also_related(Users)
            .all(&self.conn)
            .await
            .context("Failed to query cards for leaderboard")?;

        let mut entries: Vec<LeaderboardEntry> = rows
            .into_iter()
            .filter_map(|(card, owner)| {
                owner.map(|user| LeaderboardEntry {
                    username: user.username,
                    board_size: card.board_size,
                    filled_count: filled.get(&card.id).copied().unwrap_or(0),
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.filled_count
                .cmp(&a.filled_count)
                .then_with(|| a.username.cmp(&b.username))
        });

        Ok(entries)
    }

    /// All cards with their owners, ordered by username (admin listing).
    pub async fn list_with_owners(&self) -> Result<Vec<CardSummary>> {
        let rows = Cards::find()
            .find_also_related(Users)
            .all(&self.conn)
            .await
            .context("Failed to query cards with owners")?;

        let mut summaries: Vec<CardSummary> = rows
            .into_iter()
            .filter_map(|(card, owner)| {
                owner.map(|user| CardSummary {
                    id: card.id,
                    username: user.username,
                    board_size: card.board_size,
                    created_at: card.created_at,
                })
            })
            .collect();

        summaries.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(summaries)
    }
}
