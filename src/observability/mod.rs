//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Server and CLI produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows through every log line of a request
//! - The response adapter stays silent; callers log what it returns

pub mod logging;
pub mod metrics;
