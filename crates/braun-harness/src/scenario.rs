//! Scenario builder and runner.
//!
//! A scenario is a fixed list of [`Operation`]s. The runner applies each one
//! to a fresh device behind a [`Testbench`] and to a [`ReferenceModel`],
//! samples both at every tick, and finally hands the testbench to an optional
//! oracle. The device is a [`MultiplierCore`] unless the scenario is built
//! with [`Scenario::with_device`].
//!
//! ```rust,ignore
//! let report = Scenario::new("reset_independence")
//!     .step(Operation::SetOperands { a: 42, b: 7 })
//!     .step(Operation::SetReset { asserted: true })
//!     .ticks(1)
//!     .oracle(Box::new(|tb| {
//!         let out = tb.sample();
//!         if out.product() == 294 { Ok(()) } else { Err(format!("got {}", out.product())) }
//!     }))
//!     .run()?;
//! ```

use std::fmt;

use braun_core::{CoreConfig, DIRECTION_MASK, Device, MultiplierCore, ResetPolicy};

use crate::{
    error::HarnessError,
    model::{ObservableState, Operation, ReferenceModel},
    stimulus::{DEFAULT_SEED, OperandStream},
    testbench::Testbench,
};

/// Final check over the testbench once every step has run.
pub type Oracle<D = MultiplierCore> = Box<dyn Fn(&Testbench<D>) -> Result<(), String>>;

/// Builds the device under test for a reset policy.
pub type DeviceFactory<D> = fn(ResetPolicy) -> D;

/// Samples between routine progress log lines.
const LOG_INTERVAL: usize = 10;

/// A sample where the core disagreed with the reference model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Index of the operation after which the sample was taken.
    pub step: usize,
    /// Testbench cycle at the sample.
    pub cycle: u64,
    /// The operation itself.
    pub operation: Operation,
    /// What the model predicted.
    pub expected: ObservableState,
    /// What the core showed.
    pub actual: ObservableState,
}

/// Outcome of a scenario that stayed within its mismatch budget.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Reset policy the core was built with.
    pub policy: ResetPolicy,
    /// Clock cycles applied.
    pub cycles: u64,
    /// Samples taken.
    pub samples: usize,
    /// Samples that diverged from the model.
    pub mismatches: Vec<Mismatch>,
    /// Non-fatal observations (e.g. outputs stuck for a long time).
    pub warnings: Vec<String>,
}

impl ScenarioReport {
    fn new(name: String, policy: ResetPolicy) -> Self {
        Self { name, policy, cycles: 0, samples: 0, mismatches: Vec::new(), warnings: Vec::new() }
    }

    /// Fraction of samples that diverged. Zero when nothing was sampled.
    pub fn mismatch_rate(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.mismatches.len() as f64 / self.samples as f64
    }

    /// Every sample matched the model. Warnings do not count against a pass.
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// No mismatches and no warnings.
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty() && self.warnings.is_empty()
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} samples over {} cycles, {} mismatches, {} warnings",
            self.name,
            self.policy,
            self.samples,
            self.cycles,
            self.mismatches.len(),
            self.warnings.len()
        )
    }
}

/// Tracks how long the primary output has held the same value.
#[derive(Debug)]
struct StabilityWatch {
    threshold: u32,
    previous: Option<u8>,
    stable: u32,
    warned: bool,
}

impl StabilityWatch {
    fn new(threshold: u32) -> Self {
        Self { threshold, previous: None, stable: 0, warned: false }
    }

    /// Record a sample. Returns the streak length the first time a streak
    /// exceeds the threshold.
    fn observe(&mut self, value: u8) -> Option<u32> {
        if self.previous == Some(value) {
            self.stable += 1;
        } else {
            self.stable = 0;
            self.warned = false;
        }
        self.previous = Some(value);

        if self.stable > self.threshold && !self.warned {
            self.warned = true;
            return Some(self.stable);
        }
        None
    }
}

/// Builder for a single testbench scenario.
pub struct Scenario<D: Device = MultiplierCore> {
    name: String,
    policy: ResetPolicy,
    device: DeviceFactory<D>,
    stimulus: OperandStream,
    steps: Vec<Operation>,
    mismatch_tolerance: f64,
    stability_threshold: Option<u32>,
    check_values: bool,
    oracle: Option<Oracle<D>>,
}

impl Scenario {
    /// Empty scenario against a combinational core with zero tolerance.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_device(name, |policy| MultiplierCore::with_config(CoreConfig { policy }))
    }
}

impl<D: Device> Scenario<D> {
    /// Empty scenario against the device built by `device`.
    ///
    /// The factory receives the scenario's reset policy when the run starts;
    /// the reference model is always built with the same policy.
    pub fn with_device(name: impl Into<String>, device: DeviceFactory<D>) -> Self {
        Self {
            name: name.into(),
            policy: ResetPolicy::default(),
            device,
            stimulus: OperandStream::new(DEFAULT_SEED),
            steps: Vec::new(),
            mismatch_tolerance: 0.0,
            stability_threshold: None,
            check_values: true,
            oracle: None,
        }
    }

    /// Build the core with `policy`.
    #[must_use]
    pub fn with_policy(mut self, policy: ResetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reseed the operand stream used by [`Self::random_operands`].
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.stimulus = OperandStream::new(seed);
        self
    }

    /// Allow this fraction of samples to diverge before failing.
    ///
    /// Must lie in `[0, 1]`; anything else fails the run with
    /// `InvalidTolerance`.
    #[must_use]
    pub fn with_mismatch_tolerance(mut self, tolerance: f64) -> Self {
        self.mismatch_tolerance = tolerance;
        self
    }

    /// Warn when `uo_out` stays unchanged for more than `threshold` samples.
    #[must_use]
    pub fn with_stability_watch(mut self, threshold: u32) -> Self {
        self.stability_threshold = Some(threshold);
        self
    }

    /// Sample without comparing values against the model.
    ///
    /// The direction register is still checked.
    #[must_use]
    pub fn without_value_checks(mut self) -> Self {
        self.check_values = false;
        self
    }

    /// Append one operation.
    #[must_use]
    pub fn step(mut self, op: Operation) -> Self {
        self.steps.push(op);
        self
    }

    /// Append several operations.
    #[must_use]
    pub fn steps(mut self, ops: impl IntoIterator<Item = Operation>) -> Self {
        self.steps.extend(ops);
        self
    }

    /// Append `cycles` clock edges.
    ///
    /// Each `Tick` carries at most 255 cycles, so longer runs become several
    /// ticks and are sampled once per tick.
    #[must_use]
    pub fn ticks(mut self, cycles: u32) -> Self {
        let mut remaining = cycles;
        loop {
            let chunk = u8::try_from(remaining).unwrap_or(u8::MAX);
            self.steps.push(Operation::Tick { cycles: chunk });
            remaining -= u32::from(chunk);
            if remaining == 0 {
                break;
            }
        }
        self
    }

    /// Append `count` single-cycle ticks, sampling after each one.
    #[must_use]
    pub fn sample_each(mut self, count: u32) -> Self {
        self.steps.extend((0..count).map(|_| Operation::Tick { cycles: 1 }));
        self
    }

    /// Append `pairs` random operand writes, each followed by one clock edge
    /// and a sample.
    ///
    /// Pairs come from the scenario's seeded stream; later calls continue
    /// where earlier ones stopped.
    #[must_use]
    pub fn random_operands(mut self, pairs: usize) -> Self {
        for (a, b) in self.stimulus.by_ref().take(pairs) {
            self.steps.push(Operation::SetOperands { a, b });
            self.steps.push(Operation::Tick { cycles: 1 });
        }
        self
    }

    /// Check the end state with `oracle`.
    #[must_use]
    pub fn oracle(mut self, oracle: Oracle<D>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operations in order.
    pub fn operations(&self) -> &[Operation] {
        &self.steps
    }

    /// Run the scenario.
    ///
    /// # Errors
    ///
    /// - `InvalidTolerance` before anything runs if the tolerance is not in
    ///   `[0, 1]`
    /// - `DirectionMask` as soon as a sample shows `uio_oe != 0xFF`
    /// - `MismatchBudget` if the divergence rate exceeds the tolerance
    /// - `Oracle` if the final check rejects the end state
    pub fn run(self) -> Result<ScenarioReport, HarnessError> {
        let Self {
            name,
            policy,
            device,
            stimulus: _,
            steps,
            mismatch_tolerance,
            stability_threshold,
            check_values,
            oracle,
        } = self;

        if !(0.0..=1.0).contains(&mismatch_tolerance) {
            return Err(HarnessError::InvalidTolerance { tolerance: mismatch_tolerance });
        }

        tracing::info!(scenario = %name, %policy, steps = steps.len(), "scenario starting");

        let mut tb = Testbench::new(device(policy));
        let mut model = ReferenceModel::new(policy);
        let mut watch = stability_threshold.map(StabilityWatch::new);
        let mut report = ScenarioReport::new(name, policy);

        for (index, op) in steps.iter().enumerate() {
            tb.apply(op);
            model.apply(op);

            if !op.is_sample_point() {
                continue;
            }

            let actual = tb.observe();
            let outputs = actual.outputs;
            if report.samples % LOG_INTERVAL == 0 {
                tracing::debug!(
                    cycle = tb.cycle(),
                    uo_out = outputs.uo_out,
                    uio_out = outputs.uio_out,
                    "sample"
                );
            }
            report.samples += 1;

            if outputs.uio_oe != DIRECTION_MASK {
                return Err(HarnessError::DirectionMask {
                    cycle: tb.cycle(),
                    actual: outputs.uio_oe,
                });
            }

            if let Some(streak) = watch.as_mut().and_then(|w| w.observe(outputs.uo_out)) {
                tracing::warn!(cycle = tb.cycle(), streak, "output stable");
                report.warnings.push(format!(
                    "uo_out held 0x{:02X} for {streak} samples at cycle {}",
                    outputs.uo_out,
                    tb.cycle()
                ));
            }

            if check_values {
                let expected = model.observable_state();
                if expected != actual {
                    tracing::warn!(step = index, ?op, ?expected, ?actual, "divergence");
                    report.mismatches.push(Mismatch {
                        step: index,
                        cycle: tb.cycle(),
                        operation: *op,
                        expected,
                        actual,
                    });
                }
            }
        }

        report.cycles = tb.cycle();

        if report.mismatch_rate() > mismatch_tolerance {
            return Err(HarnessError::MismatchBudget {
                mismatches: report.mismatches.len(),
                samples: report.samples,
                tolerance: mismatch_tolerance,
            });
        }

        if let Some(oracle) = oracle {
            oracle(&tb)
                .map_err(|reason| HarnessError::Oracle { scenario: report.name.clone(), reason })?;
        }

        tracing::info!(scenario = %report.name, cycles = report.cycles, "scenario completed");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_split_into_byte_chunks() {
        let scenario = Scenario::new("split").ticks(600);
        assert_eq!(
            scenario.operations(),
            &[
                Operation::Tick { cycles: 255 },
                Operation::Tick { cycles: 255 },
                Operation::Tick { cycles: 90 },
            ]
        );
    }

    #[test]
    fn long_ticks_sample_once_per_chunk() {
        let report = Scenario::new("long").ticks(600).run().unwrap();
        assert_eq!(report.samples, 3);
        assert_eq!(report.cycles, 600);
    }

    #[test]
    fn random_operands_follow_seed() {
        let first = Scenario::new("a").with_seed(9).random_operands(4);
        let second = Scenario::new("b").with_seed(9).random_operands(2).random_operands(2);
        assert_eq!(first.operations(), second.operations());
        assert_eq!(first.operations().len(), 8);

        let other = Scenario::new("c").with_seed(10).random_operands(4);
        assert_ne!(first.operations(), other.operations());
    }

    #[test]
    fn tolerance_outside_unit_interval_is_rejected() {
        for tolerance in [-0.5, 1.5, f64::NAN, f64::INFINITY] {
            let result = Scenario::new("bad").with_mismatch_tolerance(tolerance).ticks(1).run();
            assert!(
                matches!(result, Err(HarnessError::InvalidTolerance { .. })),
                "{tolerance}: {result:?}"
            );
        }
    }

    #[test]
    fn tolerance_bounds_are_accepted() {
        for tolerance in [0.0, 1.0] {
            let report =
                Scenario::new("edge").with_mismatch_tolerance(tolerance).ticks(1).run().unwrap();
            assert!(report.passed());
        }
    }

    #[test]
    fn passed_ignores_warnings() {
        let report = Scenario::new("steady").with_stability_watch(2).sample_each(5).run().unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.passed());
        assert!(!report.is_clean());
    }

    #[test]
    fn zero_ticks_still_samples() {
        let scenario = Scenario::new("peek").ticks(0);
        assert_eq!(scenario.operations(), &[Operation::Tick { cycles: 0 }]);
    }

    #[test]
    fn stability_watch_warns_once_per_streak() {
        let mut watch = StabilityWatch::new(2);
        let hits: Vec<_> = [5, 5, 5, 5, 5, 6, 6, 6, 6].iter().map(|v| watch.observe(*v)).collect();
        assert_eq!(hits, vec![None, None, None, Some(3), None, None, None, None, Some(3)]);
    }

    #[test]
    fn run_counts_samples_and_cycles() {
        let report = Scenario::new("count")
            .step(Operation::SetOperands { a: 3, b: 4 })
            .ticks(10)
            .sample_each(5)
            .run()
            .unwrap();

        assert_eq!(report.samples, 6);
        assert_eq!(report.cycles, 15);
        assert!(report.is_clean());
    }

    #[test]
    fn oracle_rejection_is_reported() {
        let result = Scenario::new("reject")
            .ticks(1)
            .oracle(Box::new(|_| Err("nope".to_string())))
            .run();

        assert_eq!(
            result,
            Err(HarnessError::Oracle { scenario: "reject".to_string(), reason: "nope".to_string() })
        );
    }

    #[test]
    fn report_display() {
        let report = Scenario::new("shown").ticks(4).run().unwrap();
        assert_eq!(
            report.to_string(),
            "shown [combinational]: 1 samples over 4 cycles, 0 mismatches, 0 warnings"
        );
    }
}
