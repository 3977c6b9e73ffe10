//! Shared HTTP and infrastructure plumbing for Folio services.

pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod storage;
pub mod tracing;
