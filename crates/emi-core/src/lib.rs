pub mod amortization;
pub mod analysis;
pub mod calendar;
pub mod comparison;
pub mod config;
pub mod error;
pub mod prepayment;
pub mod session;
pub mod types;

pub use error::EmiError;
pub use types::*;

/// Standard result type for all EMI engine operations
pub type EmiResult<T> = Result<T, EmiError>;
