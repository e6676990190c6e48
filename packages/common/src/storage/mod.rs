mod cid;
mod error;
mod traits;

pub mod filesystem;
#[cfg(feature = "pinata")]
pub mod pinata;

use std::path::PathBuf;
use std::sync::Arc;

pub use cid::{Cid, item_path};
pub use error::StorageError;
pub use filesystem::FilesystemPinStore;
#[cfg(feature = "pinata")]
pub use pinata::PinataPinStore;
pub use traits::{PinFile, PinStore};

use crate::config::{PinningBackend, PinningConfig};

/// Build the pin store selected by configuration.
pub async fn build_pin_store(config: &PinningConfig) -> Result<Arc<dyn PinStore>, StorageError> {
    match config.backend {
        PinningBackend::Filesystem => {
            let store =
                FilesystemPinStore::new(PathBuf::from(&config.local_dir), config.max_file_size)
                    .await?;
            tracing::info!(dir = %config.local_dir, "Using filesystem pin store");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "pinata")]
        PinningBackend::Pinata => {
            let jwt = config
                .jwt
                .as_deref()
                .filter(|j| !j.trim().is_empty())
                .ok_or_else(|| {
                    StorageError::Upstream("pinning.jwt is required for the pinata backend".into())
                })?;
            let store = PinataPinStore::new(
                config.api_url.clone(),
                jwt,
                config.max_file_size,
                std::time::Duration::from_secs(config.timeout_secs),
            )?;
            tracing::info!(api_url = %config.api_url, "Using Pinata pin store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "pinata"))]
        PinningBackend::Pinata => Err(StorageError::Upstream(
            "pinata backend requires the `pinata` feature".into(),
        )),
    }
}
