use serde::Deserialize;

/// Which pinning service backs content uploads.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PinningBackend {
    /// Remote Pinata-compatible HTTP API.
    #[default]
    Pinata,
    /// Local content-addressed directory. Used for development and tests.
    Filesystem,
}

/// Pinning service configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct PinningConfig {
    /// Default: pinata.
    #[serde(default)]
    pub backend: PinningBackend,
    /// Base URL of the pinning API. Default: "https://api.pinata.cloud".
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token for the pinning API. Required for the pinata backend.
    #[serde(default)]
    pub jwt: Option<String>,
    /// Root directory of the filesystem backend. Default: "./data/pins".
    #[serde(default = "default_local_dir")]
    pub local_dir: String,
    /// Largest single file accepted for pinning, in bytes. Default: 10 MiB.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Per-request timeout against the pinning API. Default: 60.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.pinata.cloud".into()
}
fn default_local_dir() -> String {
    "./data/pins".into()
}
fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            backend: PinningBackend::default(),
            api_url: default_api_url(),
            jwt: None,
            local_dir: default_local_dir(),
            max_file_size: default_max_file_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
