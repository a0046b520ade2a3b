//! Core error types.

use thiserror::Error;

/// Errors from the multiplier core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A host value does not fit in an 8-bit operand.
    #[error("invalid operand: {value} is outside [0, 255]")]
    InvalidOperand {
        /// The rejected value, as supplied by the caller.
        value: u64,
    },
}

impl CoreError {
    /// Returns true if the error stems from the caller breaking the input
    /// contract rather than from the model itself.
    ///
    /// Every current variant is a caller error; the arithmetic cannot fail.
    pub fn is_caller_error(&self) -> bool {
        match self {
            Self::InvalidOperand { .. } => true,
        }
    }
}
