use chrono::Utc;
use dashboard_common::CanonicalAddress;
use dashboard_common::storage::Cid;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, sea_query::Expr};
use tracing::instrument;

use crate::entity::{active_collection, collection};
use crate::error::AppError;

/// A collection record together with its derived activation flag.
#[derive(Debug, Clone)]
pub struct CollectionState {
    pub collection: collection::Model,
    pub active: bool,
}

/// Ownership and publication records keyed by canonical address.
pub struct CollectionRegistry<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> CollectionRegistry<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert the collection, or move it to a new owner if it exists.
    #[instrument(skip(self), fields(address = %address, owner = %owner))]
    pub async fn upsert_ownership(
        &self,
        address: &CanonicalAddress,
        owner: &CanonicalAddress,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        let model = collection::ActiveModel {
            address: Set(address.to_string()),
            owner: Set(owner.to_string()),
            cid: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        collection::Entity::insert(model)
            .on_conflict(
                OnConflict::column(collection::Column::Address)
                    .update_columns([collection::Column::Owner, collection::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        Ok(())
    }

    /// Record the latest published bundle. The collection must already exist.
    #[instrument(skip(self), fields(address = %address, cid = %cid))]
    pub async fn record_publication(
        &self,
        address: &CanonicalAddress,
        cid: &Cid,
    ) -> Result<(), AppError> {
        let result = collection::Entity::update_many()
            .col_expr(collection::Column::Cid, Expr::value(Some(cid.to_string())))
            .col_expr(collection::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(collection::Column::Address.eq(address.as_str()))
            .exec(self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(not_found(address));
        }
        Ok(())
    }

    /// The CID of the latest publication, `None` if nothing was published yet.
    pub async fn lookup(&self, address: &CanonicalAddress) -> Result<Option<String>, AppError> {
        Ok(find_collection(self.conn, address).await?.cid)
    }

    pub async fn get(&self, address: &CanonicalAddress) -> Result<CollectionState, AppError> {
        let collection = find_collection(self.conn, address).await?;
        let active = active_address(self.conn).await?.as_deref() == Some(address.as_str());
        Ok(CollectionState { collection, active })
    }
}

pub(crate) fn not_found(address: &CanonicalAddress) -> AppError {
    AppError::NotFound(format!("Collection {address} not found"))
}

pub(crate) async fn find_collection<C: ConnectionTrait>(
    conn: &C,
    address: &CanonicalAddress,
) -> Result<collection::Model, AppError> {
    collection::Entity::find_by_id(address.as_str())
        .one(conn)
        .await?
        .ok_or_else(|| not_found(address))
}

/// Address the activation pointer names, if any.
pub(crate) async fn active_address<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<String>, AppError> {
    Ok(
        active_collection::Entity::find_by_id(active_collection::POINTER_ID)
            .one(conn)
            .await?
            .and_then(|p| p.address),
    )
}
