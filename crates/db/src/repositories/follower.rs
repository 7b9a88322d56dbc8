//! Follower repository.

use std::sync::Arc;

use crate::entities::{Follower, FollowerSubtype, follower, follower_subtype};
use mailroom_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

/// Follower repository for database operations.
#[derive(Clone)]
pub struct FollowerRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowerRepository {
    /// Create a new follower repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follower row by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<follower::Model>> {
        Follower::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the subscription of a partner to a document.
    pub async fn find_by_document_and_partner(
        &self,
        res_model: &str,
        res_id: i64,
        partner_id: &str,
    ) -> AppResult<Option<follower::Model>> {
        Follower::find()
            .filter(follower::Column::ResModel.eq(res_model))
            .filter(follower::Column::ResId.eq(res_id))
            .filter(follower::Column::PartnerId.eq(partner_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List followers of a document, in subscription order.
    pub async fn find_by_document(
        &self,
        res_model: &str,
        res_id: i64,
    ) -> AppResult<Vec<follower::Model>> {
        Follower::find()
            .filter(follower::Column::ResModel.eq(res_model))
            .filter(follower::Column::ResId.eq(res_id))
            .order_by_asc(follower::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every subscription of a partner.
    pub async fn find_by_partner(&self, partner_id: &str) -> AppResult<Vec<follower::Model>> {
        Follower::find()
            .filter(follower::Column::PartnerId.eq(partner_id))
            .order_by_asc(follower::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new follower row.
    pub async fn create(&self, model: follower::ActiveModel) -> AppResult<follower::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a follower row. Subscribed subtypes cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let follower = self.find_by_id(id).await?;
        if let Some(f) = follower {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Subscribed subtype ids of a follower.
    pub async fn subtype_ids(&self, follower_id: &str) -> AppResult<Vec<String>> {
        let rows = FollowerSubtype::find()
            .filter(follower_subtype::Column::FollowerId.eq(follower_id))
            .order_by_asc(follower_subtype::Column::SubtypeId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.subtype_id).collect())
    }

    /// Replace the subscribed subtype set of a follower.
    pub async fn replace_subtypes(
        &self,
        follower_id: &str,
        subtype_ids: &[String],
    ) -> AppResult<()> {
        FollowerSubtype::delete_many()
            .filter(follower_subtype::Column::FollowerId.eq(follower_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if subtype_ids.is_empty() {
            return Ok(());
        }

        let rows = subtype_ids.iter().map(|sid| follower_subtype::ActiveModel {
            follower_id: Set(follower_id.to_string()),
            subtype_id: Set(sid.clone()),
        });

        FollowerSubtype::insert_many(rows)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
