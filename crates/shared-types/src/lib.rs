//! # Shared Types Crate
//!
//! Types every bridge subsystem agrees on.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers (`Hash`, `Address`, `ChainId`)
//!   and the admitted `CrossChainInstruction` are defined once, here.
//! - **Host-driven time**: components never read a clock; the host passes a
//!   `TransitionContext` with the current height and timestamp.
//! - **One taxonomy**: every subsystem error maps onto `ErrorKind`, so the
//!   dispatcher can tell replays apart from forgeries.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
