use sea_orm::entity::prelude::*;

/// Singleton site settings. Exactly one row exists, at [`SINGLETON_ID`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "site_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    /// Side length used for newly created cards. One of 5, 7 or 9.
    pub board_size: i32,
}

pub const SINGLETON_ID: i32 = 1;

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
