//! Accounts, transactions and auth users stored in the hosted backend.

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::*;
