//! # Domain Module
//!
//! Core domain types for quorum voting.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
