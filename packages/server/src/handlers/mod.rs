pub mod collection;
pub mod publish;
pub mod role;
