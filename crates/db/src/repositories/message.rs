//! Message repository.

use std::sync::Arc;

use crate::entities::{Message, message};
use mailroom_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Message repository for database operations.
#[derive(Clone)]
pub struct MessageRepository {
    db: Arc<DatabaseConnection>,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a message by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<message::Model>> {
        Message::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a message by ID, failing when it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<message::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::MessageNotFound(id.to_string()))
    }

    /// Create a new message.
    pub async fn create(&self, model: message::ActiveModel) -> AppResult<message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
