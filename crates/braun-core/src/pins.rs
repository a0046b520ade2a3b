//! Pin-level view of the multiplier tile.
//!
//! A testbench does not call the core's methods directly; it drives the tile's
//! input pins, toggles the clock, and samples the output pins. [`Device`] is
//! that seam, and [`MultiplierCore`] implements it:
//!
//! | Pin       | Dir | Width | Meaning                        |
//! |-----------|-----|-------|--------------------------------|
//! | `ui_in`   | in  | 8     | Operand A                      |
//! | `uio_in`  | in  | 8     | Operand B                      |
//! | `uo_out`  | out | 8     | Product low byte               |
//! | `uio_out` | out | 8     | Product high byte              |
//! | `uio_oe`  | out | 8     | Direction register, `0xFF`     |
//! | `rst_n`   | in  | 1     | Reset, active-low              |
//! | `ena`     | in  | 1     | Enable, recorded only          |

use bitflags::bitflags;

use crate::multiplier::MultiplierCore;

bitflags! {
    /// Per-pin output enables for the bidirectional bus.
    ///
    /// A set bit means the pin is driven by the tile.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IoDirection: u8 {
        /// `uio[0]` driven.
        const PIN0 = 1 << 0;
        /// `uio[1]` driven.
        const PIN1 = 1 << 1;
        /// `uio[2]` driven.
        const PIN2 = 1 << 2;
        /// `uio[3]` driven.
        const PIN3 = 1 << 3;
        /// `uio[4]` driven.
        const PIN4 = 1 << 4;
        /// `uio[5]` driven.
        const PIN5 = 1 << 5;
        /// `uio[6]` driven.
        const PIN6 = 1 << 6;
        /// `uio[7]` driven.
        const PIN7 = 1 << 7;

        /// The whole bus is an output.
        const ALL_OUTPUTS = Self::PIN0.bits()
            | Self::PIN1.bits()
            | Self::PIN2.bits()
            | Self::PIN3.bits()
            | Self::PIN4.bits()
            | Self::PIN5.bits()
            | Self::PIN6.bits()
            | Self::PIN7.bits();
    }
}

/// Values driven onto the tile's input pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinInputs {
    /// Primary input bus.
    pub ui_in: u8,
    /// Bidirectional bus, input side.
    pub uio_in: u8,
    /// Enable.
    pub ena: bool,
    /// Reset, active-low.
    pub rst_n: bool,
}

impl Default for PinInputs {
    /// Zeroed buses, enabled, out of reset.
    fn default() -> Self {
        Self { ui_in: 0, uio_in: 0, ena: true, rst_n: true }
    }
}

/// Values sampled from the tile's output pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinOutputs {
    /// Primary output bus.
    pub uo_out: u8,
    /// Bidirectional bus, output side.
    pub uio_out: u8,
    /// Direction register.
    pub uio_oe: u8,
}

impl PinOutputs {
    /// Reassembled 16-bit product, `(uio_out << 8) | uo_out`.
    pub fn product(&self) -> u16 {
        u16::from_le_bytes([self.uo_out, self.uio_out])
    }

    /// Direction register as a flag set.
    pub fn direction(&self) -> IoDirection {
        IoDirection::from_bits_retain(self.uio_oe)
    }
}

/// A device under test with a pin-level interface.
pub trait Device {
    /// Apply new input pin values. Takes effect immediately.
    fn drive(&mut self, inputs: PinInputs);

    /// Rising clock edge.
    fn clock_edge(&mut self);

    /// Read the output pins.
    fn sample(&self) -> PinOutputs;
}

impl Device for MultiplierCore {
    fn drive(&mut self, inputs: PinInputs) {
        self.set_operands(inputs.ui_in, inputs.uio_in);
        self.apply_reset(!inputs.rst_n);
        self.apply_enable(inputs.ena);
    }

    fn clock_edge(&mut self) {
        self.clock();
    }

    fn sample(&self) -> PinOutputs {
        let bytes = self.evaluate();
        PinOutputs { uo_out: bytes.low, uio_out: bytes.high, uio_oe: self.direction_mask() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoreConfig, DIRECTION_MASK, ResetPolicy};

    #[test]
    fn all_outputs_matches_mask() {
        assert_eq!(IoDirection::ALL_OUTPUTS.bits(), DIRECTION_MASK);
        assert_eq!(IoDirection::ALL_OUTPUTS, IoDirection::all());
    }

    #[test]
    fn drive_maps_buses_to_operands() {
        let mut core = MultiplierCore::new();
        core.drive(PinInputs { ui_in: 42, uio_in: 7, ..PinInputs::default() });

        let out = core.sample();
        assert_eq!(out.uo_out, 0x26);
        assert_eq!(out.uio_out, 0x01);
        assert_eq!(out.product(), 294);
        assert_eq!(out.direction(), IoDirection::ALL_OUTPUTS);
    }

    #[test]
    fn rst_n_is_active_low() {
        let mut core = MultiplierCore::with_config(CoreConfig { policy: ResetPolicy::Registered });

        core.drive(PinInputs { ui_in: 3, uio_in: 5, rst_n: false, ..PinInputs::default() });
        assert!(core.control().reset_asserted);
        core.clock_edge();
        assert_eq!(core.sample().product(), 0);

        core.drive(PinInputs { ui_in: 3, uio_in: 5, rst_n: true, ..PinInputs::default() });
        assert!(!core.control().reset_asserted);
        core.clock_edge();
        assert_eq!(core.sample().product(), 15);
    }

    #[test]
    fn ena_is_recorded() {
        let mut core = MultiplierCore::new();
        core.drive(PinInputs { ena: false, ..PinInputs::default() });
        assert!(!core.control().enabled);
        assert_eq!(core.sample().uio_oe, 0xFF);
    }
}
