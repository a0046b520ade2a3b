//! Acceptance scenario suite for the multiplier tile.
//!
//! Each scenario mirrors one bring-up test of the physical tile: hold reset,
//! release it, clock for a while, sample the pins. Cycle counts follow the
//! bring-up sequence; since the model has no timing, they only matter under
//! [`ResetPolicy::Registered`].

use std::{fmt, str::FromStr};

use braun_core::ResetPolicy;

use crate::{
    error::HarnessError,
    model::Operation,
    scenario::{Scenario, ScenarioReport},
    stimulus::IO_PATTERNS,
};

pub use crate::stimulus::DEFAULT_SEED;

/// Default number of random operand pairs.
pub const DEFAULT_RANDOM_PAIRS: usize = 20;

/// Samples `uo_out` may hold still before a warning.
const STABLE_WARN_THRESHOLD: u32 = 50;

/// Operands used by the enable scenario (13 × 17 = 221).
const ENABLE_OPERANDS: (u8, u8) = (13, 17);

/// Settings shared by every scenario in a suite run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuiteConfig {
    /// Seed for the randomized scenario.
    pub seed: u64,
    /// Operand pairs drawn by the randomized scenario.
    pub random_pairs: usize,
    /// Allowed fraction of diverging samples per scenario.
    pub mismatch_tolerance: f64,
    /// Reset policy of the core under test.
    pub policy: ResetPolicy,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            random_pairs: DEFAULT_RANDOM_PAIRS,
            mismatch_tolerance: 0.0,
            policy: ResetPolicy::Combinational,
        }
    }
}

/// The scenarios of the acceptance suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuiteScenario {
    /// Reset, release, then watch 100 cycles of output.
    BasicFunctionality,
    /// Three reset pulses, then reset independence of a known product.
    ResetBehavior,
    /// Toggle enable and check the product never moves.
    EnableSignal,
    /// Drive fixed bus patterns and check the direction register.
    IoPins,
    /// Long reset, long settle, 20 samples, no value checks.
    MinimalGateLevel,
    /// Seeded random operand pairs checked against the model.
    RandomProducts,
}

impl SuiteScenario {
    /// Every scenario, in run order.
    pub const ALL: [Self; 6] = [
        Self::BasicFunctionality,
        Self::ResetBehavior,
        Self::EnableSignal,
        Self::IoPins,
        Self::MinimalGateLevel,
        Self::RandomProducts,
    ];

    /// Snake-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BasicFunctionality => "basic_functionality",
            Self::ResetBehavior => "reset_behavior",
            Self::EnableSignal => "enable_signal",
            Self::IoPins => "io_pins",
            Self::MinimalGateLevel => "minimal_gate_level",
            Self::RandomProducts => "random_products",
        }
    }

    /// Build the scenario for `config`.
    pub fn build(self, config: &SuiteConfig) -> Scenario {
        let scenario = match self {
            Self::BasicFunctionality => basic_functionality(),
            Self::ResetBehavior => reset_behavior(config.policy),
            Self::EnableSignal => enable_signal(),
            Self::IoPins => io_pins(),
            Self::MinimalGateLevel => minimal_gate_level(),
            Self::RandomProducts => random_products(config.seed, config.random_pairs),
        };

        scenario.with_policy(config.policy).with_mismatch_tolerance(config.mismatch_tolerance)
    }

    /// Build and run the scenario.
    pub fn run(self, config: &SuiteConfig) -> Result<ScenarioReport, HarnessError> {
        self.build(config).run()
    }
}

impl fmt::Display for SuiteScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuiteScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.as_str() == wanted)
            .ok_or_else(|| format!("unknown scenario '{s}'"))
    }
}

/// Run `scenarios` in order, collecting every outcome.
///
/// A failing scenario does not stop the ones after it.
pub fn run_suite(
    config: &SuiteConfig,
    scenarios: &[SuiteScenario],
) -> Vec<(SuiteScenario, Result<ScenarioReport, HarnessError>)> {
    scenarios
        .iter()
        .map(|scenario| {
            let outcome = scenario.run(config);
            if let Err(e) = &outcome {
                tracing::error!(scenario = %scenario, error = %e, "scenario failed");
            }
            (*scenario, outcome)
        })
        .collect()
}

fn reset_pulse(scenario: Scenario, held: u32, settle: u32) -> Scenario {
    scenario
        .step(Operation::SetReset { asserted: true })
        .ticks(held)
        .step(Operation::SetReset { asserted: false })
        .ticks(settle)
}

fn basic_functionality() -> Scenario {
    let scenario = Scenario::new(SuiteScenario::BasicFunctionality.as_str())
        .with_stability_watch(STABLE_WARN_THRESHOLD)
        .step(Operation::SetEnable { enabled: true })
        .step(Operation::SetOperands { a: 0, b: 0 });

    reset_pulse(scenario, 20, 10).sample_each(100)
}

fn reset_behavior(policy: ResetPolicy) -> Scenario {
    let mut scenario = Scenario::new(SuiteScenario::ResetBehavior.as_str())
        .step(Operation::SetEnable { enabled: true })
        .step(Operation::SetOperands { a: 0, b: 0 });

    for _ in 0..3 {
        scenario = reset_pulse(scenario, 10, 20);
    }

    // 42 * 7 = 294 = 0x0126
    let expected = match policy {
        ResetPolicy::Combinational => (0x26, 0x01),
        ResetPolicy::Registered => (0x00, 0x00),
    };

    scenario
        .step(Operation::SetOperands { a: 42, b: 7 })
        .ticks(1)
        .step(Operation::SetReset { asserted: true })
        .ticks(0)
        .oracle(Box::new(move |tb| {
            let out = tb.sample();
            if (out.uo_out, out.uio_out) == expected {
                Ok(())
            } else {
                Err(format!(
                    "under reset expected (0x{:02X}, 0x{:02X}), got (0x{:02X}, 0x{:02X})",
                    expected.0, expected.1, out.uo_out, out.uio_out
                ))
            }
        }))
}

fn enable_signal() -> Scenario {
    let (a, b) = ENABLE_OPERANDS;
    let product = u16::from(a) * u16::from(b);

    Scenario::new(SuiteScenario::EnableSignal.as_str())
        .step(Operation::SetEnable { enabled: false })
        .step(Operation::SetOperands { a, b })
        .step(Operation::SetReset { asserted: false })
        .ticks(10)
        .step(Operation::SetEnable { enabled: true })
        .ticks(20)
        .step(Operation::SetEnable { enabled: false })
        .ticks(10)
        .step(Operation::SetEnable { enabled: true })
        .ticks(20)
        .oracle(Box::new(move |tb| {
            let out = tb.sample();
            if out.product() == product {
                Ok(())
            } else {
                Err(format!("expected {product} after enable toggling, got {}", out.product()))
            }
        }))
}

fn io_pins() -> Scenario {
    let scenario = Scenario::new(SuiteScenario::IoPins.as_str())
        .step(Operation::SetEnable { enabled: true });

    IO_PATTERNS.iter().fold(reset_pulse(scenario, 10, 10), |scenario, &pattern| {
        scenario.step(Operation::SetOperands { a: pattern, b: pattern }).ticks(5)
    })
}

fn minimal_gate_level() -> Scenario {
    let scenario = Scenario::new(SuiteScenario::MinimalGateLevel.as_str())
        .without_value_checks()
        .step(Operation::SetEnable { enabled: true })
        .step(Operation::SetOperands { a: 0, b: 0 });

    reset_pulse(scenario, 50, 50).sample_each(20)
}

fn random_products(seed: u64, pairs: usize) -> Scenario {
    Scenario::new(SuiteScenario::RandomProducts.as_str()).with_seed(seed).random_operands(pairs)
}
