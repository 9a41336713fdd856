//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate stages, login handler, key cache, upstream clients:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (Prometheus counters)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) flows through every log line of a request
//! - Counters are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
