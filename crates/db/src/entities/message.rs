//! Message entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Message kinds.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MessageType {
    /// Incoming or outgoing email.
    #[sea_orm(string_value = "email")]
    Email,
    /// User comment posted on a document.
    #[sea_orm(string_value = "comment")]
    Comment,
    /// System notification (tracking changes, stage moves, ...).
    #[sea_orm(string_value = "notification")]
    Notification,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub message_type: MessageType,

    #[sea_orm(nullable)]
    pub subject: Option<String>,

    /// HTML body
    #[sea_orm(column_type = "Text")]
    pub body: String,

    /// Authoring partner, if known
    #[sea_orm(nullable)]
    pub author_id: Option<String>,

    /// Model of the document this message was posted on
    #[sea_orm(nullable)]
    pub res_model: Option<String>,

    /// Id of the document this message was posted on
    #[sea_orm(nullable)]
    pub res_id: Option<i64>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::AuthorId",
        to = "super::partner::Column::Id",
        on_delete = "SetNull"
    )]
    Author,

    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
