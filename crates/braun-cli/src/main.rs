//! Braun multiplier command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Multiply two operands and show the output ports
//! braun eval 42 7
//!
//! # Same, with reset held on a registered core
//! braun eval 42 7 --reset --policy registered
//!
//! # Run the acceptance suite
//! braun run --seed 1234 --count 20
//!
//! # Run one scenario with verbose sampling
//! braun --log-level debug run --scenario io_pins
//! ```

use std::io::{self, Write};

use braun_core::{CoreConfig, MultiplierCore, ResetPolicy};
use braun_harness::{SuiteConfig, SuiteScenario, run_suite, suite};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Braun multiplier model
#[derive(Parser, Debug)]
#[command(name = "braun")]
#[command(about = "8x8 Braun multiplier model and testbench")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Multiply two operands and print the output ports
    Eval {
        /// Operand A (primary input bus), 0-255
        a: u32,

        /// Operand B (bidirectional bus), 0-255
        b: u32,

        /// Hold reset while evaluating
        #[arg(long)]
        reset: bool,

        /// Deassert enable while evaluating
        #[arg(long)]
        disable: bool,

        /// Reset policy (combinational, registered)
        #[arg(long, default_value = "combinational")]
        policy: ResetPolicy,
    },

    /// Run the acceptance scenario suite
    Run {
        /// Scenario to run (repeatable); all scenarios if omitted
        #[arg(long = "scenario")]
        scenarios: Vec<SuiteScenario>,

        /// Seed for the randomized scenario
        #[arg(long, default_value_t = suite::DEFAULT_SEED)]
        seed: u64,

        /// Random operand pairs to check
        #[arg(long, default_value_t = suite::DEFAULT_RANDOM_PAIRS)]
        count: usize,

        /// Allowed fraction of diverging samples per scenario, 0.0-1.0
        #[arg(long, default_value_t = 0.0, value_parser = parse_tolerance)]
        tolerance: f64,

        /// Reset policy (combinational, registered)
        #[arg(long, default_value = "combinational")]
        policy: ResetPolicy,
    },
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let tolerance: f64 = s.parse().map_err(|e| format!("invalid tolerance '{s}': {e}"))?;
    if (0.0..=1.0).contains(&tolerance) {
        Ok(tolerance)
    } else {
        Err(format!("tolerance {tolerance} is outside [0, 1]"))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    match args.command {
        Command::Eval { a, b, reset, disable, policy } => eval(a, b, reset, !disable, policy),
        Command::Run { scenarios, seed, count, tolerance, policy } => {
            let config =
                SuiteConfig { seed, random_pairs: count, mismatch_tolerance: tolerance, policy };
            run(&config, &scenarios)
        },
    }
}

fn eval(
    a: u32,
    b: u32,
    reset: bool,
    enable: bool,
    policy: ResetPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut core = MultiplierCore::with_config(CoreConfig { policy });
    core.try_set_operands(a, b)?;
    core.apply_reset(reset);
    core.apply_enable(enable);
    core.clock();

    let product = core.product();
    let bytes = core.evaluate();

    let mut out = io::stdout().lock();
    writeln!(out, "{a} x {b} = {product} (0x{:04X}) [{policy}]", product.get())?;
    writeln!(out, "uo_out  = 0x{:02X}", bytes.low)?;
    writeln!(out, "uio_out = 0x{:02X}", bytes.high)?;
    writeln!(out, "uio_oe  = 0x{:02X}", core.direction_mask())?;
    Ok(())
}

fn run(config: &SuiteConfig, scenarios: &[SuiteScenario]) -> Result<(), Box<dyn std::error::Error>> {
    let selected = if scenarios.is_empty() { &SuiteScenario::ALL[..] } else { scenarios };

    tracing::info!(
        seed = config.seed,
        pairs = config.random_pairs,
        policy = %config.policy,
        "running {} scenarios",
        selected.len()
    );

    let outcomes = run_suite(config, selected);
    let failed = outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count();

    let mut out = io::stdout().lock();
    for (scenario, outcome) in &outcomes {
        match outcome {
            Ok(report) => {
                writeln!(out, "PASS {report}")?;
                for warning in &report.warnings {
                    writeln!(out, "     warning: {warning}")?;
                }
            },
            Err(e) => writeln!(out, "FAIL {scenario}: {e}")?,
        }
    }
    writeln!(out, "{} passed, {failed} failed", outcomes.len() - failed)?;

    if failed > 0 {
        return Err(format!("{failed} of {} scenarios failed", outcomes.len()).into());
    }
    Ok(())
}
