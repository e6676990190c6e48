use std::sync::Arc;

use dashboard_common::storage::PinStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub pin_store: Arc<dyn PinStore>,
}
