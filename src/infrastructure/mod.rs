//! Adapters implementing the domain ports.

pub mod clock;
pub mod file;
pub mod in_memory;
pub mod notify;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
