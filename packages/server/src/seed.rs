use sea_orm::*;
use tracing::info;

use crate::entity::active_collection;

/// Ensure the activation pointer row exists. An existing row is left alone
/// so the active collection survives restarts.
pub async fn seed_activation_pointer(db: &DatabaseConnection) -> Result<(), DbErr> {
    let model = active_collection::ActiveModel {
        id: Set(active_collection::POINTER_ID),
        address: Set(None),
        updated_at: Set(chrono::Utc::now()),
    };

    let result = active_collection::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(active_collection::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(0) | Err(DbErr::RecordNotInserted) => {}
        Ok(_) => info!("Seeded activation pointer"),
        Err(e) => return Err(e),
    }

    Ok(())
}
