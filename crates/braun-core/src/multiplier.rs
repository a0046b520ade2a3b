//! Multiplier core state machine.
//!
//! The core holds two operand registers and the control lines. Every
//! observable output is a function of that state:
//!
//! - [`ResetPolicy::Combinational`]: `evaluate()` is `multiply(a, b)`, always.
//! - [`ResetPolicy::Registered`]: `evaluate()` reads an output register that
//!   [`MultiplierCore::clock`] loads with `multiply(a, b)` and reset clears.
//!
//! # Invariants
//!
//! - `multiply(a, b).get() == a as u16 * b as u16` for every pair
//! - `direction_mask()` is `0xFF` regardless of any other state
//! - Enable never changes an output

use crate::{
    DIRECTION_MASK,
    control::{ControlLines, CoreConfig, ResetPolicy},
    error::CoreError,
    operand::Operand,
    product::{OutputBytes, Product},
};

/// Multiply two operands.
///
/// Both sides are widened to 16 bits first; `255 * 255 = 65025` fits, so the
/// result is exact for every input.
pub const fn multiply(a: Operand, b: Operand) -> Product {
    Product::new(a.get() as u16 * b.get() as u16)
}

/// Software model of the multiplier tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiplierCore {
    /// Operand A (primary input bus).
    a: Operand,
    /// Operand B (bidirectional bus, input side).
    b: Operand,
    /// Last recorded reset/enable state.
    control: ControlLines,
    /// Reset policy fixed at construction.
    policy: ResetPolicy,
    /// Output register. Only read under `ResetPolicy::Registered`.
    output: Product,
}

impl Default for MultiplierCore {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiplierCore {
    /// Create a combinational core with both operands at zero.
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    /// Create a core with the given configuration.
    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            a: Operand::ZERO,
            b: Operand::ZERO,
            control: ControlLines::default(),
            policy: config.policy,
            output: Product::ZERO,
        }
    }

    /// Store both operands. Last write wins.
    pub fn set_operands(&mut self, a: u8, b: u8) {
        self.a = Operand::new(a);
        self.b = Operand::new(b);
        tracing::trace!(a, b, "operands set");
    }

    /// Store both operands from wider host integers.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidOperand` if either value is above 255. The
    /// stored operands are left untouched in that case.
    pub fn try_set_operands(&mut self, a: u32, b: u32) -> Result<(), CoreError> {
        let a = Operand::try_from(a)?;
        let b = Operand::try_from(b)?;
        self.set_operands(a.get(), b.get());
        Ok(())
    }

    /// Current operands as `(a, b)`.
    pub fn operands(&self) -> (Operand, Operand) {
        (self.a, self.b)
    }

    /// The 16-bit value currently presented on the output ports.
    pub fn product(&self) -> Product {
        match self.policy {
            ResetPolicy::Combinational => multiply(self.a, self.b),
            ResetPolicy::Registered => self.output,
        }
    }

    /// Byte decomposition of [`Self::product`].
    pub fn evaluate(&self) -> OutputBytes {
        self.product().to_bytes()
    }

    /// Direction register for the bidirectional bus.
    pub const fn direction_mask(&self) -> u8 {
        DIRECTION_MASK
    }

    /// Record the reset line (`true` = held in reset).
    ///
    /// Under `Registered`, asserting reset clears the output register at once
    /// rather than waiting for a clock edge.
    pub fn apply_reset(&mut self, active: bool) {
        if self.control.reset_asserted != active {
            tracing::debug!(active, policy = %self.policy, "reset changed");
        }

        self.control.reset_asserted = active;
        if active && self.policy == ResetPolicy::Registered {
            self.output = Product::ZERO;
        }
    }

    /// Record the enable line. Has no effect on the outputs.
    pub fn apply_enable(&mut self, active: bool) {
        if self.control.enabled != active {
            tracing::debug!(active, "enable changed");
        }

        self.control.enabled = active;
    }

    /// Rising clock edge.
    ///
    /// Loads the output register under `Registered` unless reset is held. A
    /// no-op under `Combinational`.
    pub fn clock(&mut self) {
        if self.policy != ResetPolicy::Registered {
            return;
        }

        self.output =
            if self.control.reset_asserted { Product::ZERO } else { multiply(self.a, self.b) };
    }

    /// Last recorded control lines.
    pub fn control(&self) -> ControlLines {
        self.control
    }

    /// Reset policy chosen at construction.
    pub fn policy(&self) -> ResetPolicy {
        self.policy
    }
}
