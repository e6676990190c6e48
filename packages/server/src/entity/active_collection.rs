use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the only row in this table.
pub const POINTER_ID: i32 = 1;

/// Single-row pointer naming the active collection. "At most one active"
/// holds because there is only one place to record it.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "active_collection")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    /// NULL when no collection is active.
    pub address: Option<String>,
    #[sea_orm(belongs_to, from = "address", to = "address")]
    pub collection: Option<super::collection::Entity>,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
