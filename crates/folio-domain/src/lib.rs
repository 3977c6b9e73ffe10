//! Domain types shared across all Folio services.
//!
//! Pure types with no framework dependencies: ids, the submission status
//! lifecycle and pagination. Every service layer may use them; conversions to
//! and from storage rows or wire formats live in the service.

pub mod id;
pub mod pagination;
pub mod submission;
