//! Braun multiplier core.
//!
//! A software model of an 8-bit × 8-bit unsigned array multiplier packaged as
//! a small tile design: operand A arrives on the primary input bus, operand B
//! on the bidirectional bus, and the 16-bit product leaves split across the
//! primary output bus (low byte) and the bidirectional bus (high byte). The
//! bidirectional bus is permanently driven as output.
//!
//! ## Architecture
//!
//! ```text
//! braun-core
//!   ├─ multiply()        (pure arithmetic, u8 × u8 → u16)
//!   ├─ MultiplierCore    (operand registers + control-line bookkeeping)
//!   ├─ ResetPolicy       (combinational or registered output)
//!   └─ Device            (pin-level adapter driven by a testbench)
//! ```
//!
//! The arithmetic path never looks at reset or enable. Control lines only
//! matter under [`ResetPolicy::Registered`], where they gate the output
//! register rather than the multiplication itself.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod control;
mod error;
mod multiplier;
mod operand;
pub mod pins;
mod product;

pub use control::{ControlLines, CoreConfig, ResetPolicy};
pub use error::CoreError;
pub use multiplier::{MultiplierCore, multiply};
pub use operand::Operand;
pub use pins::{Device, IoDirection, PinInputs, PinOutputs};
pub use product::{OutputBytes, Product};

/// Value of the direction register: every bidirectional pin is an output.
pub const DIRECTION_MASK: u8 = 0xFF;
