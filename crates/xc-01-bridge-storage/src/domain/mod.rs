//! # Domain Module
//!
//! Record addressing and storage errors.

pub mod errors;
pub mod keys;

pub use errors::*;
pub use keys::*;
