use std::path::Path;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::{database, seed};

async fn prepared(opts: ConnectOptions) -> DatabaseConnection {
    let db = Database::connect(opts).await.unwrap();
    database::sync_schema(&db).await.unwrap();
    seed::seed_activation_pointer(&db).await.unwrap();
    db
}

/// Fresh in-memory SQLite database with the schema synced and the activation
/// pointer seeded. One pooled connection, so the database lives as long as
/// the pool.
pub async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    prepared(opts).await
}

/// SQLite database file under `dir`, pooled the way `init_db` pools it, so
/// transactions on different connections really overlap.
pub async fn pooled_file_db(dir: &Path) -> DatabaseConnection {
    let url = format!("sqlite://{}?mode=rwc", dir.join("dashboard.db").display());
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(database::MAX_CONNECTIONS)
        .min_connections(1)
        .sqlx_logging(false);
    prepared(opts).await
}
