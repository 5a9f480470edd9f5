//! # Adapters

pub mod epoch_source;

pub use epoch_source::InMemoryEpochSource;
