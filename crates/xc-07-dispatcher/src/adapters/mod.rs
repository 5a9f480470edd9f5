//! # Adapters

pub mod registry;

pub use registry::InMemorySideChainRegistry;
