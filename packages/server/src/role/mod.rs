pub mod store;

pub use store::{RoleStore, normalize_email};
