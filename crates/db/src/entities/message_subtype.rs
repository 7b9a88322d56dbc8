//! Message subtype entity.
//!
//! Subtypes categorize messages so followers can subscribe selectively.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message_subtype")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Model this subtype applies to; NULL = any model
    #[sea_orm(nullable)]
    pub res_model: Option<String>,

    /// Whether new followers subscribe to this subtype by default
    #[sea_orm(default_value = true)]
    pub default_subscribed: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
