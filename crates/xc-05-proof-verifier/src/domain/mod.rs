//! # Domain Module
//!
//! Claims, trust roots and errors.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
