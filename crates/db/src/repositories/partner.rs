//! Partner repository.

use std::sync::Arc;

use crate::entities::{Partner, partner};
use mailroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Partner repository for database operations.
#[derive(Clone)]
pub struct PartnerRepository {
    db: Arc<DatabaseConnection>,
}

impl PartnerRepository {
    /// Create a new partner repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a partner by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<partner::Model>> {
        Partner::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a partner by ID, failing when it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<partner::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PartnerNotFound(id.to_string()))
    }

    /// Find partners by a set of IDs, ordered by id.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<partner::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Partner::find()
            .filter(partner::Column::Id.is_in(ids.iter().map(String::as_str)))
            .order_by_asc(partner::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new partner.
    pub async fn create(&self, model: partner::ActiveModel) -> AppResult<partner::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a partner. Followers and notifications cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let partner = self.find_by_id(id).await?;
        if let Some(p) = partner {
            p.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
