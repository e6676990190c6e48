pub mod address;
pub mod config;
pub mod fingerprint;
pub mod storage;

pub use address::CanonicalAddress;
pub use fingerprint::{Fingerprint, derive, parse_hash_list};
