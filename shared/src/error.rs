//! Errors raised by the pure domain layer

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::FarmStatus;

/// Domain rule violations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid dimensions: width {width} and height {height} must both be positive")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Invalid share size {share_size}: {reason}")]
    InvalidShareSize {
        share_size: Decimal,
        reason: &'static str,
    },

    #[error("Invalid owner address: {0}")]
    InvalidOwnerAddress(&'static str),

    #[error("Ownership share exceeds 100%: requested {requested}, available {available}")]
    ShareExceeded {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Invalid crop specification '{name}': {reason}")]
    InvalidCropSpecification { name: String, reason: &'static str },

    #[error("Invalid sensor reading: {0}")]
    InvalidReading(&'static str),

    #[error("Cannot change farm status from {from} to {to}")]
    InvalidStateTransition { from: FarmStatus, to: FarmStatus },

    #[error("Farm is {0} and no longer accepts readings")]
    FarmNotActive(FarmStatus),
}

pub type DomainResult<T> = Result<T, DomainError>;
