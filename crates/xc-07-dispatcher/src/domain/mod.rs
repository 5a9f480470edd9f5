//! # Domain Module
//!
//! Router tags, claim shapes and the dispatcher error.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
