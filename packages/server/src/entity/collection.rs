use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    /// Canonical contract address (`0x` + 40 lowercase hex digits).
    #[sea_orm(primary_key, auto_increment = false)]
    pub address: String,

    /// Canonical address of the controlling account.
    pub owner: String,

    /// Root CID of the latest published metadata bundle.
    pub cid: Option<String>,

    #[sea_orm(has_one)]
    pub activation: HasOne<super::active_collection::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
