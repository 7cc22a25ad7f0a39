//! Classical two-input logic gates and their truth-table datasets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Width of the register and of every truth-table row.
pub const NUM_INPUTS: usize = 2;

/// A classical two-input logic gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum LogicGate {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl LogicGate {
    /// All gates in declaration order.
    pub const ALL: [LogicGate; 6] = [
        LogicGate::And,
        LogicGate::Or,
        LogicGate::Nand,
        LogicGate::Nor,
        LogicGate::Xor,
        LogicGate::Xnor,
    ];

    /// Evaluate the gate on two bits. Any non-zero input counts as 1.
    pub fn apply(self, a: u8, b: u8) -> u8 {
        let (a, b) = (a != 0, b != 0);
        let out = match self {
            LogicGate::And => a && b,
            LogicGate::Or => a || b,
            LogicGate::Nand => !(a && b),
            LogicGate::Nor => !(a || b),
            LogicGate::Xor => a ^ b,
            LogicGate::Xnor => !(a ^ b),
        };
        u8::from(out)
    }

    /// Upper-case gate name.
    pub fn name(self) -> &'static str {
        match self {
            LogicGate::And => "AND",
            LogicGate::Or => "OR",
            LogicGate::Nand => "NAND",
            LogicGate::Nor => "NOR",
            LogicGate::Xor => "XOR",
            LogicGate::Xnor => "XNOR",
        }
    }
}

impl fmt::Display for LogicGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicGate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicGate::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownGate(s.to_string()))
    }
}

impl TryFrom<String> for LogicGate {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Evaluate `gate` on two bits.
pub fn gate_function(gate: LogicGate, a: u8, b: u8) -> u8 {
    gate.apply(a, b)
}

/// All bit tuples of width `n` in lexicographic order (`00, 01, 10, 11` for `n = 2`).
///
/// Rows are grown one bit at a time, so there is no `2^n` index to overflow;
/// the table itself holds `2^n` rows.
pub fn truth_table_inputs(n: usize) -> Vec<Vec<u8>> {
    (0..n).fold(vec![Vec::with_capacity(n)], |rows, _| {
        rows.into_iter()
            .flat_map(|prefix| {
                [0u8, 1].map(|bit| {
                    let mut row = prefix.clone();
                    row.push(bit);
                    row
                })
            })
            .collect()
    })
}

/// One training row: input bits as floats and the 0/1 target.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Input bits (0.0 or 1.0), one per wire.
    pub inputs: Vec<f64>,
    /// Expected output (0.0 or 1.0).
    pub target: f64,
}

/// Ordered training set, one sample per truth-table row.
pub type Dataset = Vec<Sample>;

/// Build the dataset for `gate`, in truth-table order.
pub fn build_dataset(gate: LogicGate) -> Dataset {
    truth_table_inputs(NUM_INPUTS)
        .into_iter()
        .map(|bits| Sample {
            target: f64::from(gate.apply(bits[0], bits[1])),
            inputs: bits.into_iter().map(f64::from).collect(),
        })
        .collect()
}
