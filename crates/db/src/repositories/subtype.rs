//! Message subtype repository.

use std::sync::Arc;

use crate::entities::{MessageSubtype, message_subtype};
use mailroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Message subtype repository for database operations.
#[derive(Clone)]
pub struct SubtypeRepository {
    db: Arc<DatabaseConnection>,
}

impl SubtypeRepository {
    /// Create a new subtype repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a subtype by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<message_subtype::Model>> {
        MessageSubtype::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new subtype.
    pub async fn create(
        &self,
        model: message_subtype::ActiveModel,
    ) -> AppResult<message_subtype::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Subtypes a new follower of `res_model` subscribes to by default:
    /// generic subtypes (no model) plus the model-specific defaults.
    pub async fn find_default_for_model(
        &self,
        res_model: &str,
    ) -> AppResult<Vec<message_subtype::Model>> {
        MessageSubtype::find()
            .filter(message_subtype::Column::DefaultSubscribed.eq(true))
            .filter(
                Condition::any()
                    .add(message_subtype::Column::ResModel.is_null())
                    .add(message_subtype::Column::ResModel.eq(res_model)),
            )
            .order_by_asc(message_subtype::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
