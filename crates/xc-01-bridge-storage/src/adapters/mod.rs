//! # Adapters

pub mod memory;

pub use memory::InMemoryKVStore;
