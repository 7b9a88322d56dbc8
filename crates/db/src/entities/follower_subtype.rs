//! Follower-subtype join entity (subscribed subtypes per follower).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "follower_subtype")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub follower_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub subtype_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::follower::Entity",
        from = "Column::FollowerId",
        to = "super::follower::Column::Id",
        on_delete = "Cascade"
    )]
    Follower,

    #[sea_orm(
        belongs_to = "super::message_subtype::Entity",
        from = "Column::SubtypeId",
        to = "super::message_subtype::Column::Id",
        on_delete = "Cascade"
    )]
    Subtype,
}

impl Related<super::follower::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Follower.def()
    }
}

impl Related<super::message_subtype::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subtype.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
