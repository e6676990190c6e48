use chrono::Utc;
use dashboard_common::CanonicalAddress;
use dashboard_common::storage::Cid;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, instrument};

use super::registry::{active_address, find_collection};
use crate::entity::{active_collection, collection};
use crate::error::AppError;

/// Serializes activations across server instances. Released at commit.
pub const ACTIVATION_LOCK: &str = "SELECT pg_advisory_xact_lock(hashtext('collection-activation'))";

/// The collection the public frontend currently serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCollection {
    pub address: String,
    pub cid: Option<String>,
}

/// Moves the single activation pointer between collections.
pub struct ActivationManager<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ActivationManager<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Begin a transaction holding the activation lock and return the
    /// locked pointer row.
    async fn lock_pointer(
        &self,
    ) -> Result<(DatabaseTransaction, active_collection::Model), AppError> {
        let txn = self.db.begin().await?;

        match txn.get_database_backend() {
            DbBackend::Postgres => {
                txn.execute_unprepared(ACTIVATION_LOCK).await?;
            }
            DbBackend::Sqlite => {
                // SQLite ignores FOR UPDATE. Writing first takes the database
                // write lock up front, so concurrent activations wait out the
                // busy timeout instead of failing on a read-to-write upgrade.
                active_collection::Entity::update_many()
                    .col_expr(
                        active_collection::Column::UpdatedAt,
                        Expr::col(active_collection::Column::UpdatedAt),
                    )
                    .filter(active_collection::Column::Id.eq(active_collection::POINTER_ID))
                    .exec(&txn)
                    .await?;
            }
            _ => {}
        }

        let pointer = active_collection::Entity::find_by_id(active_collection::POINTER_ID)
            .lock(LockType::Update)
            .one(&txn)
            .await?;

        let Some(pointer) = pointer else {
            txn.rollback().await?;
            return Err(AppError::Internal(
                "activation pointer row is missing; was the database seeded?".into(),
            ));
        };

        Ok((txn, pointer))
    }

    /// Set the collection's CID and make it the only active collection.
    /// On any failure the previously active collection stays active.
    #[instrument(skip(self), fields(address = %address, cid = %cid))]
    pub async fn activate(
        &self,
        address: &CanonicalAddress,
        cid: &Cid,
    ) -> Result<ActiveCollection, AppError> {
        let (txn, pointer) = self.lock_pointer().await?;

        let existing = match find_collection(&txn, address).await {
            Ok(c) => c,
            Err(e) => {
                txn.rollback().await?;
                return Err(e);
            }
        };

        let now = Utc::now();
        let mut target: collection::ActiveModel = existing.into();
        target.cid = Set(Some(cid.to_string()));
        target.updated_at = Set(now);
        target.update(&txn).await?;

        let previous = pointer.address.clone();
        let mut pointer: active_collection::ActiveModel = pointer.into();
        pointer.address = Set(Some(address.to_string()));
        pointer.updated_at = Set(now);
        pointer.update(&txn).await?;

        txn.commit().await?;

        info!(previous = ?previous, "Activated collection");

        Ok(ActiveCollection {
            address: address.to_string(),
            cid: Some(cid.to_string()),
        })
    }

    /// The active collection, if any.
    pub async fn current(&self) -> Result<Option<ActiveCollection>, AppError> {
        let Some(address) = active_address(self.db).await? else {
            return Ok(None);
        };

        let collection = collection::Entity::find_by_id(address.clone())
            .one(self.db)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("activation pointer names unknown collection {address}"))
            })?;

        Ok(Some(ActiveCollection {
            address: collection.address,
            cid: collection.cid,
        }))
    }

    /// Clear the pointer so no collection is active. Returns the address that
    /// was active.
    #[instrument(skip(self))]
    pub async fn deactivate(&self) -> Result<Option<String>, AppError> {
        let (txn, pointer) = self.lock_pointer().await?;

        let previous = pointer.address.clone();
        if previous.is_some() {
            let mut pointer: active_collection::ActiveModel = pointer.into();
            pointer.address = Set(None);
            pointer.updated_at = Set(Utc::now());
            pointer.update(&txn).await?;
        }

        txn.commit().await?;

        if let Some(ref address) = previous {
            info!(address = %address, "Deactivated collection");
        }
        Ok(previous)
    }
}
