use crate::entities::prelude::*;
use crate::entities::{cells, users};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default API key for the seeded admin (regenerate in production)
pub const DEFAULT_ADMIN_API_KEY: &str = "bingorr_default_api_key_please_regenerate";

/// Hash the default admin password using Argon2id
fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let password = b"password";
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password, &salt)
        .expect("Failed to hash default password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(SiteConfig)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Cards)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Cells)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // At most one cell per (card, row, col)
        manager
            .create_index(
                Index::create()
                    .name("idx_cells_card_row_col")
                    .table(Cells)
                    .col(cells::Column::CardId)
                    .col(cells::Column::Row)
                    .col(cells::Column::Col)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed the admin account with a hashed default password
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_default_password();

        let insert_admin = sea_orm_migration::sea_query::Query::insert()
            .into_table(Users)
            .columns([
                users::Column::Username,
                users::Column::PasswordHash,
                users::Column::ApiKey,
                users::Column::IsSuperuser,
                users::Column::CreatedAt,
                users::Column::UpdatedAt,
            ])
            .values_panic([
                "admin".into(),
                password_hash.into(),
                DEFAULT_ADMIN_API_KEY.into(),
                true.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert_admin).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cells).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cards).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SiteConfig).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
