pub mod active_collection;
pub mod collection;
pub mod dashboard_role;
