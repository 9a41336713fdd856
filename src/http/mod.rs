//! HTTP surface of the console.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request id, trace span, timeout, CORS)
//!     → security (origin filter → perimeter verifier)
//!     → admin guard on data routes
//!     → handlers/ (validate, call upstream, wrap `{data}`)
//!     → response.rs (error bodies, envelopes)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, DataEnvelope};
pub use server::{build_router, AppState, HttpServer};
