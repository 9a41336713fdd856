//! Payment service status: one-shot probes and monitor streams.

pub mod feeds;
pub mod monitor;
pub mod types;

pub use feeds::PaymentFeeds;
pub use types::{CallbackSnapshot, HealthReport, HealthStatus};
