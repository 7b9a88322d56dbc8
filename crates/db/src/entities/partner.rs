//! Partner entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Email notification preference of a partner.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EmailPreference {
    /// Receive an email for every notified message.
    #[sea_orm(string_value = "all")]
    All,
    /// Only emails and comments.
    #[sea_orm(string_value = "comment")]
    Comment,
    /// Only incoming emails.
    #[sea_orm(string_value = "email")]
    Email,
    /// Never send emails.
    #[sea_orm(string_value = "none")]
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partner")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Email address; partners without one never receive notification mails
    #[sea_orm(nullable)]
    pub email: Option<String>,

    /// How this partner wants message notifications delivered by email
    pub notify_email: EmailPreference,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    User,

    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,

    #[sea_orm(has_many = "super::follower::Entity")]
    Follower,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
