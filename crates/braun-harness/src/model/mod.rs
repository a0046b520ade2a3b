//! Reference model for model-based testing.
//!
//! The model restates the tile's pin contract with nothing but native integer
//! arithmetic. It serves as the oracle against which the core is verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Independence: It never calls into `braun_core`'s arithmetic
//! - Deterministic: Same inputs produce same outputs

pub mod operation;
mod reference;

pub use operation::Operation;
pub use reference::{ObservableState, ReferenceModel, expected_product};
