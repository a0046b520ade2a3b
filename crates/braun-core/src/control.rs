//! Control lines and the policy that decides what they do.

use std::{fmt, str::FromStr};

/// Snapshot of the reset and enable inputs.
///
/// `reset_asserted` is the logical reset state; the pin itself is active-low,
/// so `rst_n == false` maps to `reset_asserted == true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlLines {
    /// Reset is held.
    pub reset_asserted: bool,
    /// The tile is selected.
    pub enabled: bool,
}

impl Default for ControlLines {
    fn default() -> Self {
        Self { reset_asserted: false, enabled: true }
    }
}

/// How reset interacts with the output ports.
///
/// Enable never affects the outputs under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPolicy {
    /// Outputs follow the operands directly. Reset is recorded and ignored.
    #[default]
    Combinational,

    /// The product passes through an output register loaded on each clock
    /// edge. Asserting reset clears the register and holds it at zero.
    Registered,
}

impl ResetPolicy {
    /// All policies, in declaration order.
    pub const ALL: [Self; 2] = [Self::Combinational, Self::Registered];

    /// Lower-case name used on the command line and in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Combinational => "combinational",
            Self::Registered => "registered",
        }
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "combinational" | "comb" => Ok(Self::Combinational),
            "registered" | "reg" | "clocked" => Ok(Self::Registered),
            other => Err(format!("unknown reset policy '{other}'")),
        }
    }
}

/// Construction-time settings for a [`crate::MultiplierCore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoreConfig {
    /// Reset policy for the output ports.
    pub policy: ResetPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_policy_default() {
        assert_eq!(ResetPolicy::default(), ResetPolicy::Combinational);
    }

    #[test]
    fn reset_policy_parses_aliases() {
        assert_eq!("Registered".parse::<ResetPolicy>(), Ok(ResetPolicy::Registered));
        assert_eq!("clocked".parse::<ResetPolicy>(), Ok(ResetPolicy::Registered));
        assert_eq!("comb".parse::<ResetPolicy>(), Ok(ResetPolicy::Combinational));
        assert!("latched".parse::<ResetPolicy>().is_err());
    }

    #[test]
    fn reset_policy_round_trips_through_display() {
        for policy in ResetPolicy::ALL {
            assert_eq!(policy.to_string().parse::<ResetPolicy>(), Ok(policy));
        }
    }

    #[test]
    fn control_lines_default_out_of_reset_and_enabled() {
        let lines = ControlLines::default();
        assert!(!lines.reset_asserted);
        assert!(lines.enabled);
    }
}
