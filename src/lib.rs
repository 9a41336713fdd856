//! Admin console gateway.
//!
//! Serves the console API and UI behind a three-stage access gate:
//!
//! ```text
//!     Client Request
//!     ──▶ origin filter ──▶ perimeter verifier ──▶ admin session guard ──▶ handlers
//!          (allow-list)     (gateway RS256 JWT)     (HS256 cookie)            │
//!                                                                             ▼
//!                                                  hosted backend · blob store · payment service
//! ```

// Access gate
pub mod admin;
pub mod security;

// HTTP surface
pub mod http;

// Upstream clients
pub mod assets;
pub mod backend;
pub mod payments;
pub mod upstream;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ConsoleConfig;
pub use http::{build_router, AppState, HttpServer};
pub use lifecycle::Shutdown;
