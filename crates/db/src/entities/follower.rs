//! Follower entity.
//!
//! A follower row subscribes a partner to a document, identified by the model
//! of the followed resource and its record id. The (res_model, res_id,
//! partner_id) combination is conceptually unique per subscription; the
//! service layer enforces this on follow rather than a database constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "follower")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Model of the followed resource
    pub res_model: String,

    /// Id of the followed resource
    pub res_id: i64,

    pub partner_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id",
        on_delete = "Cascade"
    )]
    Partner,

    #[sea_orm(has_many = "super::follower_subtype::Entity")]
    Subtypes,
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
