use thiserror::Error;
use uuid::Uuid;

use cashcast_domain::MonthKey;

/// Raised when a projection request is rejected at the validation boundary.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid amount {amount} on {rule} {id}")]
    InvalidAmount { rule: &'static str, id: Uuid, amount: f64 },
    #[error("Invalid window on {rule} {id}: {start} is after {end}")]
    InvalidWindow {
        rule: &'static str,
        id: Uuid,
        start: MonthKey,
        end: MonthKey,
    },
    #[error("Rolling budget {0} has a zero-month window")]
    EmptyRollingWindow(Uuid),
    #[error("Projection horizon of {0} months exceeds the supported maximum")]
    HorizonTooLong(i32),
}
