//! The module contains the errors the billing side of the engine can throw.
//!
//! Fare computation itself never fails: malformed trip or tariff fields
//! degrade to zero-valued components. Errors only come from invoice handling:
//!
//! - [`InvalidPeriod`] thrown when a billing period ends before it starts.
//! - [`InvalidInvoice`] thrown when an invoice header is incomplete.
//! - [`EmptyInvoice`] thrown when emitting an invoice with no lines.
//!
//!  [`InvalidPeriod`]: EngineError::InvalidPeriod
//!  [`InvalidInvoice`]: EngineError::InvalidInvoice
//!  [`EmptyInvoice`]: EngineError::EmptyInvoice
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Invalid invoice: {0}")]
    InvalidInvoice(String),
    #[error("Invoice \"{0}\" has no trips to bill")]
    EmptyInvoice(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidPeriod(a), Self::InvalidPeriod(b)) => a == b,
            (Self::InvalidInvoice(a), Self::InvalidInvoice(b)) => a == b,
            (Self::EmptyInvoice(a), Self::EmptyInvoice(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
