use std::io::Write;

use crate::exit_code;
use crate::{
    AddOne, CRecord, CVectorF32, CVectorPairF32, Call, Check, CheckKind, CopytoAndSum, CountSame,
    Expected, Observed, Result, SymbolAddress, TwoVec,
};

/// An ordered list of checks run against one library. The position of a
/// check determines its exit codes.
#[derive(Debug, Clone)]
pub struct Suite {
    name: String,
    checks: Vec<Check>,
}

impl Suite {
    pub fn new(name: impl Into<String>, checks: Vec<Check>) -> Self {
        Self {
            name: name.into(),
            checks,
        }
    }

    /// `copyto_and_sum` then `countsame`, exit codes 4..=7.
    pub fn vectors() -> Self {
        Self::new(
            "vectors",
            vec![
                Check::call(
                    "copyto_and_sum",
                    Call {
                        signature: "float copyto_and_sum(CVectorPair_Float32 pair)",
                        input: "from = {1, 2, 3}, to = {4, 5, 6}",
                        label: "Sum of copied values",
                        records: || vec![CVectorPairF32::layout(), CVectorF32::layout()],
                        invoke: invoke_copyto_and_sum,
                        expected: Expected::Within {
                            value: 6.0,
                            tolerance: 0.1,
                        },
                    },
                ),
                Check::call(
                    "countsame",
                    Call {
                        signature: "int32_t countsame(MyTwoVec* list, int32_t length)",
                        input: "list = [(1, 2), (5, 5), (3, 4)], length = 3",
                        label: "Count of same vectors",
                        records: || vec![TwoVec::layout()],
                        invoke: invoke_countsame,
                        expected: Expected::Exactly(1),
                    },
                ),
            ],
        )
    }

    /// `jc_add_one`, exit codes 4 and 5.
    pub fn add_one() -> Self {
        Self::new(
            "add-one",
            vec![Check::call(
                "jc_add_one",
                Call {
                    signature: "int jc_add_one(int value)",
                    input: "value = 41",
                    label: "Result of adding one",
                    records: Vec::new,
                    invoke: invoke_add_one,
                    expected: Expected::Exactly(42),
                },
            )],
        )
    }

    /// A single check that `symbol` is exported, exit code 4.
    pub fn exported(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self::new(format!("exported {}", &symbol), vec![Check::exported(symbol)])
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn checks(&self) -> &[Check] {
        self.checks.as_slice()
    }

    /// Describes every check: its signature, input, expected result, exit
    /// codes and the byte layout of each record it passes.
    pub fn write_listing(&self, output: &mut impl Write) -> Result<()> {
        writeln!(output, "Suite `{}`", self.name)?;
        for (index, check) in self.checks.iter().enumerate() {
            writeln!(output)?;
            writeln!(output, "{}. {}", index + 1, check.symbol())?;
            writeln!(
                output,
                "   exit {} if not exported",
                exit_code::symbol_not_found(index)
            )?;
            if let CheckKind::Call(call) = check.kind() {
                writeln!(output, "   signature: {}", call.signature)?;
                writeln!(output, "   input:     {}", call.input)?;
                writeln!(output, "   expected:  {}", call.expected)?;
                writeln!(
                    output,
                    "   exit {} on an unexpected result",
                    exit_code::unexpected_result(index)
                )?;
                for record in (call.records)() {
                    for line in record.to_string().lines() {
                        writeln!(output, "   {}", line)?;
                    }
                }
            }
        }
        Ok(())
    }
}

unsafe fn invoke_copyto_and_sum(symbol: SymbolAddress) -> Observed {
    let function: CopytoAndSum = symbol.cast();
    let mut from = [1.0f32, 2.0, 3.0];
    let mut to = [4.0f32, 5.0, 6.0];
    let pair = CVectorPairF32 {
        from: CVectorF32::new(&mut from),
        to: CVectorF32::new(&mut to),
    };
    Observed::Float(function(pair))
}

unsafe fn invoke_countsame(symbol: SymbolAddress) -> Observed {
    let function: CountSame = symbol.cast();
    let list = [TwoVec::new(1, 2), TwoVec::new(5, 5), TwoVec::new(3, 4)];
    Observed::Integer(function(list.as_ptr(), list.len() as i32) as i64)
}

unsafe fn invoke_add_one(symbol: SymbolAddress) -> Observed {
    let function: AddOne = symbol.cast();
    Observed::Integer(function(41) as i64)
}
