//! 8-bit multiplicand.

use std::fmt;

use crate::error::CoreError;

/// One of the two 8-bit unsigned multiplicands.
///
/// Construction from `u8` is infallible. Wider host integers go through
/// `TryFrom` and are rejected, never truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Operand(u8);

impl Operand {
    /// Zero operand.
    pub const ZERO: Self = Self(0);

    /// Largest operand (255).
    pub const MAX: Self = Self(u8::MAX);

    /// Wrap a byte.
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Raw byte value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for Operand {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Operand> for u8 {
    fn from(operand: Operand) -> Self {
        operand.0
    }
}

impl TryFrom<u32> for Operand {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| CoreError::InvalidOperand { value: u64::from(value) })
    }
}

impl TryFrom<u64> for Operand {
    type Error = CoreError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value).map(Self).map_err(|_| CoreError::InvalidOperand { value })
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
