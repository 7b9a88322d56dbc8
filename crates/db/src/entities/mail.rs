//! Outbound mail entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery state of an outbound mail.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MailState {
    /// Queued, waiting to be sent.
    #[sea_orm(string_value = "outgoing")]
    Outgoing,
    /// Delivered to the transport.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Delivery failed for every recipient.
    #[sea_orm(string_value = "exception")]
    Exception,
    /// Cancelled before sending.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mail")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The message this mail notifies about
    #[sea_orm(nullable)]
    pub message_id: Option<String>,

    /// Direct recipient list. Notification mails leave this empty: their
    /// recipients travel out-of-band as the recipient id list passed to send.
    pub email_to: String,

    /// HTML body
    #[sea_orm(column_type = "Text")]
    pub body_html: String,

    pub state: MailState,

    /// Delete the row after a successful send
    #[sea_orm(default_value = false)]
    pub auto_delete: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::message::Entity",
        from = "Column::MessageId",
        to = "super::message::Column::Id",
        on_delete = "Cascade"
    )]
    Message,
}

impl ActiveModelBehavior for ActiveModel {}
