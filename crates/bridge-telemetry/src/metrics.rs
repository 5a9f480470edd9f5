//! Prometheus counters for the bridge.
//!
//! All metrics follow the naming convention: `xc_<event>_total`. Label
//! `verifier` is one of `evm`, `alt_mpt`, `signature`, `relay`.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Instructions admitted, by verifier family
    pub static ref INSTRUCTIONS_ADMITTED: IntCounterVec = IntCounterVec::new(
        Opts::new("xc_instructions_admitted_total", "Cross-chain instructions admitted"),
        &["verifier"]
    ).expect("metric creation failed");

    /// Claims rejected because their cross-chain ID was already applied
    pub static ref REPLAYS_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new("xc_replays_rejected_total", "Claims rejected as replays"),
        &["verifier"]
    ).expect("metric creation failed");

    /// Foreign headers newly stored by the light client
    pub static ref HEADERS_ACCEPTED: IntCounter = IntCounter::new(
        "xc_headers_accepted_total",
        "PoA headers verified and stored"
    ).expect("metric creation failed");

    /// Canonical-chain switches that did not extend the old tip
    pub static ref CANONICAL_REORGS: IntCounter = IntCounter::new(
        "xc_canonical_reorgs_total",
        "Canonical chain reorganizations"
    ).expect("metric creation failed");

    /// Relay votes stored
    pub static ref VOTES_RECORDED: IntCounter = IntCounter::new(
        "xc_votes_recorded_total",
        "Relay-attested votes recorded"
    ).expect("metric creation failed");

    /// Custody spends fully signed
    pub static ref CUSTODY_FINALIZED: IntCounter = IntCounter::new(
        "xc_custody_finalized_total",
        "BTC custody transactions finalized"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling it again is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(INSTRUCTIONS_ADMITTED.clone()),
        Box::new(REPLAYS_REJECTED.clone()),
        Box::new(HEADERS_ACCEPTED.clone()),
        Box::new(CANONICAL_REORGS.clone()),
        Box::new(VOTES_RECORDED.clone()),
        Box::new(CUSTODY_FINALIZED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
