//! Deterministic testbench for the Braun multiplier tile.
//!
//! Drives a [`braun_core::Device`] through its pins one logical clock cycle
//! at a time, the way a hardware testbench drives a device under test. There
//! is no waveform or timing model: a cycle is one call to
//! [`Device::clock_edge`](braun_core::Device::clock_edge).
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation of the tile's
//! pin contract. Operations are applied to both the model and the real core,
//! and their observable states are compared after every step.
//!
//! # Scenario Suite
//!
//! The `suite` module rebuilds the tile's acceptance tests (basic
//! functionality, reset, enable, I/O pins, minimal gate-level, randomized
//! products) as seeded [`Scenario`]s that run in microseconds.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub mod model;
pub mod scenario;
pub mod stimulus;
pub mod suite;
mod testbench;

pub use error::HarnessError;
pub use model::{ObservableState, Operation, ReferenceModel};
pub use scenario::{DeviceFactory, Mismatch, Oracle, Scenario, ScenarioReport};
pub use stimulus::{DEFAULT_SEED, IO_PATTERNS, OperandStream};
pub use suite::{SuiteConfig, SuiteScenario, run_suite};
pub use testbench::Testbench;
