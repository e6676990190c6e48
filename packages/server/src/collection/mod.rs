pub mod activation;
pub mod registry;

pub use activation::{ActivationManager, ActiveCollection};
pub use registry::{CollectionRegistry, CollectionState};
