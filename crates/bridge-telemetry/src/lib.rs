//! # Bridge Telemetry
//!
//! Observability for the bridge verification core.
//!
//! - **Logging**: one `tracing-subscriber` registry, pretty or JSON
//! - **Metrics**: Prometheus counters for admissions, replays, headers,
//!   reorgs, votes and custody finalizations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_telemetry::{init_logging, register_metrics, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! register_metrics()?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `XC_SERVICE_NAME` | `xc-bridge` | Service name |
//! | `XC_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `XC_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `XC_JSON_LOGS` | `false` | JSON log lines |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, CANONICAL_REORGS, CUSTODY_FINALIZED, HEADERS_ACCEPTED,
    INSTRUCTIONS_ADMITTED, REGISTRY, REPLAYS_REJECTED, VOTES_RECORDED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Unusable configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
