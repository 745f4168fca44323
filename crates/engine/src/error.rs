//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] returned when an amount cannot be parsed or converted.
//! - [`MalformedResponse`] returned when a server payload breaks a domain
//!   invariant and is rejected at the API boundary.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`MalformedResponse`]: EngineError::MalformedResponse
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),
    #[error("{0}")]
    UnknownVariant(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
