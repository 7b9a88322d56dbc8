//! Outbound mail repository.

use std::sync::Arc;

use crate::entities::{Mail, mail};
use mailroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

/// Outbound mail repository for database operations.
#[derive(Clone)]
pub struct MailRepository {
    db: Arc<DatabaseConnection>,
}

impl MailRepository {
    /// Create a new mail repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a mail by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<mail::Model>> {
        Mail::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a mail by ID, failing when it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<mail::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("mail {id}")))
    }

    /// Create a new mail row.
    pub async fn create(&self, model: mail::ActiveModel) -> AppResult<mail::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update the delivery state of a mail.
    pub async fn set_state(&self, id: &str, state: mail::MailState) -> AppResult<()> {
        let existing = self.get_by_id(id).await?;
        let mut active: mail::ActiveModel = existing.into();
        active.state = Set(state);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a mail row.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let mail = self.find_by_id(id).await?;
        if let Some(m) = mail {
            m.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// List queued outgoing mails, oldest first.
    pub async fn find_outgoing(&self) -> AppResult<Vec<mail::Model>> {
        Mail::find()
            .filter(mail::Column::State.eq(mail::MailState::Outgoing))
            .order_by_asc(mail::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
