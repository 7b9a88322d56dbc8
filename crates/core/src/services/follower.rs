//! Document following service.

use crate::generate_id;
use mailroom_common::AppResult;
use mailroom_db::{
    entities::follower,
    repositories::{FollowerRepository, SubtypeRepository},
};
use sea_orm::Set;

/// Follower service for subscription management.
#[derive(Clone)]
pub struct FollowerService {
    follower_repo: FollowerRepository,
    subtype_repo: SubtypeRepository,
}

impl FollowerService {
    /// Create a new follower service.
    #[must_use]
    pub const fn new(follower_repo: FollowerRepository, subtype_repo: SubtypeRepository) -> Self {
        Self {
            follower_repo,
            subtype_repo,
        }
    }

    /// Subscribe a partner to a document.
    ///
    /// Idempotent: re-following replaces the subscribed subtype set instead of
    /// creating a second row. `None` subtypes fall back to the model's default
    /// subtypes.
    pub async fn follow(
        &self,
        res_model: &str,
        res_id: i64,
        partner_id: &str,
        subtype_ids: Option<Vec<String>>,
    ) -> AppResult<follower::Model> {
        let subtype_ids = match subtype_ids {
            Some(ids) => ids,
            None => self
                .subtype_repo
                .find_default_for_model(res_model)
                .await?
                .into_iter()
                .map(|s| s.id)
                .collect(),
        };

        let existing = self
            .follower_repo
            .find_by_document_and_partner(res_model, res_id, partner_id)
            .await?;

        let follower = match existing {
            Some(f) => f,
            None => {
                self.follower_repo
                    .create(follower::ActiveModel {
                        id: Set(generate_id()),
                        res_model: Set(res_model.to_string()),
                        res_id: Set(res_id),
                        partner_id: Set(partner_id.to_string()),
                    })
                    .await?
            }
        };

        self.follower_repo
            .replace_subtypes(&follower.id, &subtype_ids)
            .await?;

        tracing::debug!(
            res_model = %res_model,
            res_id = res_id,
            partner_id = %partner_id,
            subtypes = subtype_ids.len(),
            "Partner follows document"
        );

        Ok(follower)
    }

    /// Unsubscribe a partner from a document. Returns whether a subscription
    /// was removed.
    pub async fn unfollow(
        &self,
        res_model: &str,
        res_id: i64,
        partner_id: &str,
    ) -> AppResult<bool> {
        let existing = self
            .follower_repo
            .find_by_document_and_partner(res_model, res_id, partner_id)
            .await?;

        match existing {
            Some(f) => {
                self.follower_repo.delete(&f.id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// List followers of a document, in subscription order.
    pub async fn followers_of(
        &self,
        res_model: &str,
        res_id: i64,
    ) -> AppResult<Vec<follower::Model>> {
        self.follower_repo.find_by_document(res_model, res_id).await
    }

    /// Whether a partner follows a document.
    pub async fn is_following(
        &self,
        res_model: &str,
        res_id: i64,
        partner_id: &str,
    ) -> AppResult<bool> {
        Ok(self
            .follower_repo
            .find_by_document_and_partner(res_model, res_id, partner_id)
            .await?
            .is_some())
    }

    /// Subscribed subtype ids of a follower row.
    pub async fn subscribed_subtypes(&self, follower_id: &str) -> AppResult<Vec<String>> {
        self.follower_repo.subtype_ids(follower_id).await
    }
}
