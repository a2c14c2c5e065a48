use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cells")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub card_id: i32,

    pub row: i32,

    pub col: i32,

    /// Cell caption, at most 100 characters. Immutable after creation.
    pub text: String,

    /// True only for the single center cell.
    pub is_free: bool,

    /// Starts true for the free cell, false otherwise. Only ever flips
    /// false -> true; there is no unmark operation.
    pub is_marked: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cards::Entity",
        from = "Column::CardId",
        to = "super::cards::Column::Id",
        on_delete = "Cascade"
    )]
    Card,
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Card.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
