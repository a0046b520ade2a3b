//! Operations for model-based testing.
//!
//! Operations are everything a testbench can do to the tile. They are
//! generated randomly by proptest or the fuzzer and applied to both the model
//! and the real core.

use arbitrary::Arbitrary;

/// One testbench action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Drive both operand buses.
    SetOperands {
        /// Value for `ui_in`.
        a: u8,
        /// Value for `uio_in`.
        b: u8,
    },

    /// Assert or release reset (the pin is active-low).
    SetReset {
        /// Reset held.
        asserted: bool,
    },

    /// Drive the enable pin.
    SetEnable {
        /// Tile selected.
        enabled: bool,
    },

    /// Apply rising clock edges, then sample.
    ///
    /// `cycles == 0` samples without clocking.
    Tick {
        /// Edges to apply.
        cycles: u8,
    },
}

impl Operation {
    /// Whether the scenario runner takes a sample after this operation.
    pub fn is_sample_point(&self) -> bool {
        matches!(self, Self::Tick { .. })
    }
}
