//! Reference model of the tile's pins.

use braun_core::{MultiplierCore, PinOutputs, ResetPolicy};

use super::operation::Operation;

/// Expected 16-bit product, computed in 32-bit space.
pub fn expected_product(a: u8, b: u8) -> u16 {
    let wide = u32::from(a) * u32::from(b);
    let [low, high, ..] = wide.to_le_bytes();
    u16::from_le_bytes([low, high])
}

/// Observable state for oracle comparison.
///
/// The subset of tile state visible from outside: the output pins plus the
/// recorded control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservableState {
    /// Output pins.
    pub outputs: PinOutputs,
    /// Reset held.
    pub reset_asserted: bool,
    /// Tile selected.
    pub enabled: bool,
}

impl ObservableState {
    /// Read the observable state of a real core.
    pub fn capture(core: &MultiplierCore) -> Self {
        use braun_core::Device;

        let control = core.control();
        Self {
            outputs: core.sample(),
            reset_asserted: control.reset_asserted,
            enabled: control.enabled,
        }
    }
}

/// The reference implementation of the tile.
#[derive(Debug, Clone)]
pub struct ReferenceModel {
    policy: ResetPolicy,
    a: u8,
    b: u8,
    reset_asserted: bool,
    enabled: bool,
    /// Output register (registered policy only).
    register: u16,
}

impl ReferenceModel {
    /// Model in the same power-on state as a fresh testbench.
    pub fn new(policy: ResetPolicy) -> Self {
        Self { policy, a: 0, b: 0, reset_asserted: false, enabled: true, register: 0 }
    }

    /// Reset policy being modeled.
    pub fn policy(&self) -> ResetPolicy {
        self.policy
    }

    /// Apply an operation.
    pub fn apply(&mut self, op: &Operation) {
        match *op {
            Operation::SetOperands { a, b } => {
                self.a = a;
                self.b = b;
            },
            Operation::SetReset { asserted } => {
                self.reset_asserted = asserted;
                if asserted && self.policy == ResetPolicy::Registered {
                    self.register = 0;
                }
            },
            Operation::SetEnable { enabled } => self.enabled = enabled,
            Operation::Tick { cycles } => {
                if cycles > 0 && self.policy == ResetPolicy::Registered {
                    self.register =
                        if self.reset_asserted { 0 } else { expected_product(self.a, self.b) };
                }
            },
        }
    }

    /// Product the output pins should currently show.
    pub fn product(&self) -> u16 {
        match self.policy {
            ResetPolicy::Combinational => expected_product(self.a, self.b),
            ResetPolicy::Registered => self.register,
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        let [low, high] = self.product().to_le_bytes();
        ObservableState {
            outputs: PinOutputs { uo_out: low, uio_out: high, uio_oe: 0xFF },
            reset_asserted: self.reset_asserted,
            enabled: self.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_product_literals() {
        assert_eq!(expected_product(255, 255), 0xFE01);
        assert_eq!(expected_product(42, 7), 294);
        assert_eq!(expected_product(16, 16), 0x0100);
    }

    #[test]
    fn combinational_model_ignores_reset() {
        let mut model = ReferenceModel::new(ResetPolicy::Combinational);
        model.apply(&Operation::SetOperands { a: 42, b: 7 });
        model.apply(&Operation::SetReset { asserted: true });

        let state = model.observable_state();
        assert_eq!((state.outputs.uo_out, state.outputs.uio_out), (0x26, 0x01));
        assert!(state.reset_asserted);
    }

    #[test]
    fn registered_model_needs_edge() {
        let mut model = ReferenceModel::new(ResetPolicy::Registered);
        model.apply(&Operation::SetOperands { a: 10, b: 10 });
        assert_eq!(model.product(), 0);

        model.apply(&Operation::Tick { cycles: 0 });
        assert_eq!(model.product(), 0);

        model.apply(&Operation::Tick { cycles: 3 });
        assert_eq!(model.product(), 100);
    }

    #[test]
    fn fresh_model_matches_fresh_core() {
        for policy in ResetPolicy::ALL {
            let core = MultiplierCore::with_config(braun_core::CoreConfig { policy });
            let model = ReferenceModel::new(policy);
            assert_eq!(model.observable_state(), ObservableState::capture(&core));
        }
    }
}
