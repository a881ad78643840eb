//! # Tiki Core
//!
//! Phone OTP domain and business logic for the Tiki auth service.
//! This crate contains the OTP record entity, the store contract with an
//! in-memory implementation, the issuance and verification service, and
//! the error types shared by the outer layers.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
