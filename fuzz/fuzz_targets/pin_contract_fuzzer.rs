//! Fuzz target for the multiplier tile's pin contract
//!
//! # Strategy
//!
//! - Operation sequences: Arbitrary operand writes, reset pulses, enable
//!   toggles and clock runs
//! - Both reset policies: The policy is part of the input
//! - Host values: Arbitrary `u32` operands through `try_set_operands`
//!
//! # Invariants
//!
//! - Core and reference model agree on every output pin after every operation
//! - `uio_oe` is `0xFF` after every operation
//! - Combinational outputs equal `a * b` of the last operands, always
//! - Registered outputs are zero while reset is held
//! - Out-of-range host operands are rejected and leave state untouched
//! - NEVER panic on any input

#![no_main]

use arbitrary::Arbitrary;
use braun_core::{CoreConfig, MultiplierCore, Operand, ResetPolicy};
use braun_harness::{ObservableState, Operation, ReferenceModel, Testbench};
use libfuzzer_sys::fuzz_target;

/// Fuzz input: policy choice, pin operations, and raw host operands.
#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    registered: bool,
    ops: Vec<Operation>,
    host_operands: Vec<(u32, u32)>,
}

fuzz_target!(|input: FuzzInput| {
    let policy =
        if input.registered { ResetPolicy::Registered } else { ResetPolicy::Combinational };

    let mut model = ReferenceModel::new(policy);
    let mut tb = Testbench::new(MultiplierCore::with_config(CoreConfig { policy }));

    for op in &input.ops {
        model.apply(op);
        tb.apply(op);

        let actual = ObservableState::capture(tb.dut());
        assert_eq!(model.observable_state(), actual, "divergence after {op:?}");
        assert_eq!(actual.outputs.uio_oe, 0xFF);

        let inputs = tb.inputs();
        match policy {
            ResetPolicy::Combinational => {
                let expected = u32::from(inputs.ui_in) * u32::from(inputs.uio_in);
                assert_eq!(u32::from(actual.outputs.product()), expected);
            },
            ResetPolicy::Registered => {
                if !inputs.rst_n {
                    assert_eq!(actual.outputs.product(), 0);
                }
            },
        }
    }

    let mut core = MultiplierCore::with_config(CoreConfig { policy });
    for &(a, b) in &input.host_operands {
        let before = core.operands();
        match core.try_set_operands(a, b) {
            Ok(()) => assert!(a <= 255 && b <= 255),
            Err(_) => {
                assert!(a > 255 || b > 255);
                assert_eq!(core.operands(), before);
            },
        }
    }

    if let Some(&(a, b)) = input.host_operands.last() {
        if let (Ok(a), Ok(b)) = (Operand::try_from(a), Operand::try_from(b)) {
            assert_eq!(core.operands(), (a, b));
        }
    }
});
