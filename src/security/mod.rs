//! Security subsystem: the access-control gate.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → origin.rs (source address on allow-list?)            403 ip_forbidden
//!     → perimeter.rs (gateway assertion, keys from jwks.rs)   401 access_jwt_*
//!     → admin::auth (session cookie from session.rs)          401 admin_*
//!     → handler
//! ```
//!
//! # Design Decisions
//! - Each stage is terminal on rejection; no handler runs after a failure
//! - Perimeter claims and the admin identity are separate request extensions
//! - The key set cache is the only shared mutable state

pub mod headers;
pub mod jwks;
pub mod origin;
pub mod perimeter;
pub mod session;

pub use jwks::{HttpKeySource, KeySetError, KeySource, SigningKeyCache};
pub use origin::AllowList;
pub use perimeter::{perimeter_bypass_allowed, PerimeterClaims, PerimeterVerifier};
pub use session::{AdminCredentials, AdminIdentity, SessionSigner, SESSION_COOKIE, SESSION_TTL_SECS};
