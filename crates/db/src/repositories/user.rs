//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use mailroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user by ID, failing when it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))
    }

    /// Find the primary user of a partner.
    ///
    /// A partner may be linked to zero or more users. The primary user is the
    /// one with the smallest id; ids are time-ordered ULIDs, so this is the
    /// earliest linked identity. Every "which user speaks for this partner"
    /// decision in the subsystem goes through this single method.
    pub async fn find_primary_by_partner(&self, partner_id: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::PartnerId.eq(partner_id))
            .order_by_asc(user::Column::Id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
