//! Notification repository.

use std::sync::Arc;

use crate::entities::{Notification, notification};
use mailroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new notification row.
    pub async fn create(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find notifications of a partner for a set of messages, in insertion
    /// order (ascending id; ids are time-ordered ULIDs).
    pub async fn find_by_partner_and_messages(
        &self,
        partner_id: &str,
        message_ids: &[String],
    ) -> AppResult<Vec<notification::Model>> {
        if message_ids.is_empty() {
            return Ok(Vec::new());
        }

        Notification::find()
            .filter(notification::Column::PartnerId.eq(partner_id))
            .filter(notification::Column::MessageId.is_in(message_ids.iter().map(String::as_str)))
            .order_by_asc(notification::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all notifications attached to a message, in insertion order.
    pub async fn find_by_message(&self, message_id: &str) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::MessageId.eq(message_id))
            .order_by_asc(notification::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bulk-update the read flag of the given notification rows.
    pub async fn set_read_many(&self, ids: &[String], read: bool) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = Notification::update_many()
            .filter(notification::Column::Id.is_in(ids.iter().map(String::as_str)))
            .col_expr(notification::Column::Read, read.into())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Mark every unread notification of a partner as read.
    pub async fn set_all_read(&self, partner_id: &str) -> AppResult<u64> {
        let result = Notification::update_many()
            .filter(notification::Column::PartnerId.eq(partner_id))
            .filter(notification::Column::Read.eq(false))
            .col_expr(notification::Column::Read, true.into())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Count unread notifications of a partner.
    pub async fn count_unread(&self, partner_id: &str) -> AppResult<u64> {
        Notification::find()
            .filter(notification::Column::PartnerId.eq(partner_id))
            .filter(notification::Column::Read.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Build a notification active model with an explicit read flag.
#[must_use]
pub fn new_notification(
    id: String,
    partner_id: &str,
    message_id: &str,
    read: bool,
) -> notification::ActiveModel {
    notification::ActiveModel {
        id: Set(id),
        partner_id: Set(partner_id.to_string()),
        message_id: Set(message_id.to_string()),
        read: Set(read),
    }
}
