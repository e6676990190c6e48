use config::{Config, ConfigError, Environment, File};
use dashboard_common::config::PinningConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Metadata publishing configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct PublishConfig {
    /// Folder inside the bundle that holds `<index>.json` documents. Default: "metadata".
    #[serde(default = "default_metadata_folder")]
    pub metadata_folder: String,
    /// Largest number of images accepted by one publish request. Default: 500.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Display name used when a publish request names no collection. Default: "Collection".
    #[serde(default = "default_collection_name")]
    pub default_collection_name: String,
    /// Request body limit for publish uploads, in bytes. Default: 256 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_metadata_folder() -> String {
    "metadata".into()
}
fn default_max_items() -> usize {
    500
}
fn default_collection_name() -> String {
    "Collection".into()
}
fn default_max_upload_size() -> usize {
    256 * 1024 * 1024
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            metadata_folder: default_metadata_folder(),
            max_items: default_max_items(),
            default_collection_name: default_collection_name(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pinning: PinningConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://./data/dashboard.db?mode=rwc")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., DASHBOARD__PINNING__JWT)
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
