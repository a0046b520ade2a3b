//! Pin-level driver for a device under test.

use braun_core::{Device, Operand, PinInputs, PinOutputs};

use crate::{
    error::HarnessError,
    model::{ObservableState, Operation},
};

/// Drives a [`Device`] through its input pins and counts clock cycles.
///
/// Every setter re-drives the full input frame, so the device always sees the
/// latest value of every pin.
#[derive(Debug, Clone)]
pub struct Testbench<D: Device> {
    /// Device under test.
    dut: D,
    /// Current values on the input pins.
    inputs: PinInputs,
    /// Rising edges applied so far.
    cycle: u64,
}

impl<D: Device> Testbench<D> {
    /// Wrap a device and drive the default input frame onto it.
    pub fn new(mut dut: D) -> Self {
        let inputs = PinInputs::default();
        dut.drive(inputs);
        Self { dut, inputs, cycle: 0 }
    }

    /// Device under test.
    pub fn dut(&self) -> &D {
        &self.dut
    }

    /// Current input pin values.
    pub fn inputs(&self) -> PinInputs {
        self.inputs
    }

    /// Rising edges applied since construction.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Replace the whole input frame.
    pub fn set_inputs(&mut self, inputs: PinInputs) {
        tracing::debug!(
            cycle = self.cycle,
            ui_in = inputs.ui_in,
            uio_in = inputs.uio_in,
            ena = inputs.ena,
            rst_n = inputs.rst_n,
            "drive"
        );
        self.inputs = inputs;
        self.dut.drive(inputs);
    }

    /// Drive the primary input bus.
    pub fn set_ui_in(&mut self, value: u8) {
        self.set_inputs(PinInputs { ui_in: value, ..self.inputs });
    }

    /// Drive the bidirectional bus.
    pub fn set_uio_in(&mut self, value: u8) {
        self.set_inputs(PinInputs { uio_in: value, ..self.inputs });
    }

    /// Drive both operand buses from host-width values.
    ///
    /// Rejects values above 255 instead of truncating them onto the bus; the
    /// pins keep their previous values on error.
    pub fn drive_operands(&mut self, a: u32, b: u32) -> Result<(), HarnessError> {
        let a = Operand::try_from(a)?;
        let b = Operand::try_from(b)?;
        self.set_inputs(PinInputs { ui_in: a.get(), uio_in: b.get(), ..self.inputs });
        Ok(())
    }

    /// Drive the enable pin.
    pub fn set_ena(&mut self, value: bool) {
        self.set_inputs(PinInputs { ena: value, ..self.inputs });
    }

    /// Drive the active-low reset pin.
    pub fn set_rst_n(&mut self, value: bool) {
        self.set_inputs(PinInputs { rst_n: value, ..self.inputs });
    }

    /// One rising clock edge.
    pub fn rising_edge(&mut self) {
        self.dut.clock_edge();
        self.cycle += 1;
    }

    /// `count` rising clock edges.
    pub fn clock_cycles(&mut self, count: u32) {
        tracing::trace!(from = self.cycle, count, "clock");
        for _ in 0..count {
            self.rising_edge();
        }
    }

    /// Read the output pins.
    pub fn sample(&self) -> PinOutputs {
        self.dut.sample()
    }

    /// Observable state as seen from the pins: sampled outputs plus the
    /// control lines currently driven.
    pub fn observe(&self) -> ObservableState {
        ObservableState {
            outputs: self.sample(),
            reset_asserted: !self.inputs.rst_n,
            enabled: self.inputs.ena,
        }
    }

    /// Apply a model operation to the device.
    pub fn apply(&mut self, op: &Operation) {
        match *op {
            Operation::SetOperands { a, b } => {
                self.set_inputs(PinInputs { ui_in: a, uio_in: b, ..self.inputs });
            },
            Operation::SetReset { asserted } => self.set_rst_n(!asserted),
            Operation::SetEnable { enabled } => self.set_ena(enabled),
            Operation::Tick { cycles } => self.clock_cycles(u32::from(cycles)),
        }
    }
}

#[cfg(test)]
mod tests {
    use braun_core::{CoreConfig, CoreError, MultiplierCore, ResetPolicy};

    use super::*;

    #[test]
    fn new_drives_defaults() {
        let tb = Testbench::new(MultiplierCore::new());
        assert_eq!(tb.inputs(), PinInputs::default());
        assert_eq!(tb.cycle(), 0);
        assert!(tb.dut().control().enabled);
    }

    #[test]
    fn setters_keep_other_pins() {
        let mut tb = Testbench::new(MultiplierCore::new());
        tb.set_ui_in(12);
        tb.set_uio_in(11);
        tb.set_rst_n(false);

        let inputs = tb.inputs();
        assert_eq!((inputs.ui_in, inputs.uio_in, inputs.rst_n, inputs.ena), (12, 11, false, true));
        assert_eq!(tb.sample().product(), 132);
    }

    #[test]
    fn clock_cycles_counts_edges() {
        let mut tb = Testbench::new(MultiplierCore::new());
        tb.clock_cycles(20);
        tb.rising_edge();
        assert_eq!(tb.cycle(), 21);
    }

    #[test]
    fn drive_operands_rejects_wide_values() {
        let mut tb = Testbench::new(MultiplierCore::new());
        tb.drive_operands(200, 3).unwrap();
        assert_eq!(tb.sample().product(), 600);

        let err = tb.drive_operands(7, 256).unwrap_err();
        assert_eq!(err, HarnessError::Core(CoreError::InvalidOperand { value: 256 }));
        assert_eq!((tb.inputs().ui_in, tb.inputs().uio_in), (200, 3));
    }

    #[test]
    fn observe_reads_driven_control_lines() {
        let mut tb = Testbench::new(MultiplierCore::new());
        tb.set_rst_n(false);
        tb.set_ena(false);

        let state = tb.observe();
        assert!(state.reset_asserted);
        assert!(!state.enabled);
        assert_eq!(state, crate::ObservableState::capture(tb.dut()));
    }

    #[test]
    fn apply_tick_loads_registered_output() {
        let core = MultiplierCore::with_config(CoreConfig { policy: ResetPolicy::Registered });
        let mut tb = Testbench::new(core);

        tb.apply(&Operation::SetOperands { a: 16, b: 16 });
        assert_eq!(tb.sample().product(), 0);

        tb.apply(&Operation::Tick { cycles: 1 });
        assert_eq!((tb.sample().uo_out, tb.sample().uio_out), (0x00, 0x01));
    }
}
