//! 16-bit product and its byte-wide output split.

use std::fmt;

/// The 16-bit unsigned result of multiplying two operands.
///
/// Always in `[0, 65025]` when produced by [`crate::multiply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Product(u16);

impl Product {
    /// Zero product (the cleared output register).
    pub const ZERO: Self = Self(0);

    /// Wrap a raw 16-bit value.
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Raw 16-bit value.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Split into the two output ports.
    pub const fn to_bytes(self) -> OutputBytes {
        let [low, high] = self.0.to_le_bytes();
        OutputBytes { low, high }
    }
}

impl From<OutputBytes> for Product {
    fn from(bytes: OutputBytes) -> Self {
        bytes.reassemble()
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product as presented on the output ports.
///
/// `low` drives the primary output bus, `high` drives the bidirectional bus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OutputBytes {
    /// Bits 0..8 of the product.
    pub low: u8,
    /// Bits 8..16 of the product.
    pub high: u8,
}

impl OutputBytes {
    /// Both ports low.
    pub const ZERO: Self = Self { low: 0, high: 0 };

    /// Rebuild the 16-bit product: `(high << 8) | low`.
    pub const fn reassemble(self) -> Product {
        Product(u16::from_le_bytes([self.low, self.high]))
    }
}

impl fmt::Display for OutputBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "low=0x{:02X} high=0x{:02X}", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_low_and_high() {
        let bytes = Product::new(0xFE01).to_bytes();
        assert_eq!(bytes, OutputBytes { low: 0x01, high: 0xFE });
    }

    #[test]
    fn reassembles_high_over_low() {
        let bytes = OutputBytes { low: 0x26, high: 0x01 };
        assert_eq!(bytes.reassemble(), Product::new(294));
    }

    #[test]
    fn display_is_hex() {
        let bytes = OutputBytes { low: 0x0A, high: 0xB0 };
        assert_eq!(bytes.to_string(), "low=0x0A high=0xB0");
    }
}
