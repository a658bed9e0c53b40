//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log output (stdout: pretty, compact or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (method, url, status, elapsed_ms)
//! - Request ID flows from the HTTP layer through trace spans
//! - Metrics are opt-in

pub mod logging;
pub mod metrics;
