use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;

use crate::entities::site_config::{self, SINGLETON_ID};
use crate::models::BoardSize;

/// Access to the single site settings row.
///
/// The row is created explicitly through [`get_or_init`](Self::get_or_init)
/// at process startup; there is no lazy-creation magic elsewhere.
pub struct SiteConfigRepository {
    conn: DatabaseConnection,
}

impl SiteConfigRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns the settings row, inserting it with the given default
    /// board size if absent.
    pub async fn get_or_init(&self, default_size: BoardSize) -> Result<site_config::Model> {
        let existing = site_config::Entity::find_by_id(SINGLETON_ID)
            .one(&self.conn)
            .await
            .context("Failed to query site config")?;

        if let Some(config) = existing {
            return Ok(config);
        }

        let created = site_config::ActiveModel {
            id: Set(SINGLETON_ID),
            board_size: Set(default_size.side()),
        }
        .insert(&self.conn)
        .await
        .context("Failed to initialize site config")?;

        info!("Initialized site config with board size {}", default_size);
        Ok(created)
    }

    /// Current board size used for new cards.
    pub async fn board_size(&self) -> Result<BoardSize> {
        let config = site_config::Entity::find_by_id(SINGLETON_ID)
            .one(&self.conn)
            .await
            .context("Failed to query site config")?
            .ok_or_else(|| anyhow::anyhow!("Site config row missing; startup init did not run"))?;

        BoardSize::try_from(config.board_size)
            .context("Stored board size is outside the allowed set")
    }

    /// Persists a new board size. Existing cards keep their snapshot.
    pub async fn set_board_size(&self, size: BoardSize) -> Result<()> {
        let config = site_config::Entity::find_by_id(SINGLETON_ID)
            .one(&self.conn)
            .await
            .context("Failed to query site config")?
            .ok_or_else(|| anyhow::anyhow!("Site config row missing; startup init did not run"))?;

        let mut active: site_config::ActiveModel = config.into();
        active.board_size = Set(size.side());
        active
            .update(&self.conn)
            .await
            .context("Failed to update board size")?;

        info!("Board size set to {}", size);
        Ok(())
    }
}
