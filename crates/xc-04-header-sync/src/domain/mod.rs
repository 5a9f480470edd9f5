//! # Domain Module
//!
//! PoA header, trusted-header records and errors.

pub mod entities;
pub mod errors;
pub mod header;

pub use entities::*;
pub use errors::*;
pub use header::*;
