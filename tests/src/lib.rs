//! # Bridge Test Suite
//!
//! Cross-subsystem tests that drive the bridge end to end through
//! `CrossChainDispatcher`, plus property tests over the replay ledger and
//! vote engine.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── deposit_flows.rs    # EVM, signature, alt-trie and relay deposits
//! │   ├── poa_light_client.rs # Header sync, recency and fork choice
//! │   ├── btc_custody.rs      # P2SH and P2WSH custody spends
//! │   ├── configuration.rs    # TOML-driven dispatcher setup
//! │   └── properties.rs       # proptest invariants
//! └── benches/
//!     └── bridge_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p xc-tests
//! cargo test -p xc-tests integration::btc_custody
//! cargo bench -p xc-tests
//! ```

pub mod integration;
