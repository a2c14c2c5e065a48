//! `SeaORM` implementation of the `AdminService` trait.

use async_trait::async_trait;
use tracing::warn;

use crate::db::Store;
use crate::models::BoardSize;
use crate::services::admin_service::{AdminError, AdminService, AdminSettings};

pub struct SeaOrmAdminService {
    store: Store,
}

impl SeaOrmAdminService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AdminService for SeaOrmAdminService {
    async fn settings(&self) -> Result<AdminSettings, AdminError> {
        let board_size = self.store.board_size().await?;
        let cards = self.store.list_cards_with_owners().await?;

        Ok(AdminSettings {
            board_size: board_size.side(),
            allowed_sizes: BoardSize::ALL.iter().map(|s| s.side()).collect(),
            cards,
        })
    }

    async fn change_board_size(&self, new_size: i32) -> Result<BoardSize, AdminError> {
        let size = BoardSize::try_from(new_size).inspect_err(|e| {
            warn!("Rejected board size change: {e}");
        })?;

        self.store.set_board_size(size).await?;
        Ok(size)
    }

    async fn reset_card(&self, card_id: i32) -> Result<(), AdminError> {
        if self.store.delete_card(card_id).await? {
            Ok(())
        } else {
            Err(AdminError::CardNotFound(card_id))
        }
    }

    async fn reset_all_cards(&self) -> Result<u64, AdminError> {
        Ok(self.store.delete_all_cards().await?)
    }
}
