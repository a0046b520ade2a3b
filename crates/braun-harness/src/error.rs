//! Harness error types.

use braun_core::CoreError;
use thiserror::Error;

/// Reasons a scenario fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HarnessError {
    /// The direction register read something other than all-outputs.
    #[error("direction register is 0x{actual:02X} at cycle {cycle}, expected 0xFF")]
    DirectionMask {
        /// Cycle at which the sample was taken.
        cycle: u64,
        /// Sampled `uio_oe` value.
        actual: u8,
    },

    /// More samples diverged from the reference model than allowed.
    #[error("{mismatches} of {samples} samples diverged, tolerance is {tolerance}")]
    MismatchBudget {
        /// Samples that diverged.
        mismatches: usize,
        /// Samples taken.
        samples: usize,
        /// Allowed fraction of diverging samples.
        tolerance: f64,
    },

    /// The scenario's final oracle rejected the end state.
    #[error("oracle rejected scenario '{scenario}': {reason}")]
    Oracle {
        /// Scenario name.
        scenario: String,
        /// Oracle's explanation.
        reason: String,
    },

    /// The mismatch tolerance is not a fraction in `[0, 1]`.
    #[error("mismatch tolerance {tolerance} is outside [0, 1]")]
    InvalidTolerance {
        /// Rejected tolerance.
        tolerance: f64,
    },

    /// The core rejected a host value.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl HarnessError {
    /// Returns true for failures that no mismatch tolerance can excuse.
    ///
    /// A wrong direction register or an oracle rejection is a contract
    /// violation. An exceeded mismatch budget depends on the tolerance the
    /// run was configured with, and a bad tolerance or host value is a
    /// setup mistake.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Self::DirectionMask { .. } | Self::Oracle { .. } => true,
            Self::MismatchBudget { .. } | Self::InvalidTolerance { .. } | Self::Core(_) => false,
        }
    }
}
