//! Error kinds of the block algebra, the aggregator and the line parser.

use crate::models::AddressCount;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CidrError {
    /// A line matched neither the `address[/length]` nor the `address,address` grammar.
    #[error("Malformed input '{line}': {reason}")]
    Malformed { line: String, reason: String },
    #[error("Network length /{length} is too long, max /{max}")]
    LengthOutOfRange { length: u8, max: u8 },
    #[error("Prefix {prefix:#x} does not fit in {bits} bits")]
    PrefixOutOfRange { prefix: u128, bits: u8 },
    /// Two input blocks share addresses.
    #[error("Overlapping blocks {first} and {second}")]
    Overlap { first: String, second: String },
    /// A merge pass changed the number of covered addresses.
    #[error("Address count changed in pass {pass}: {before} before, {after} after")]
    CountMismatch {
        pass: usize,
        before: AddressCount,
        after: AddressCount,
    },
    #[error("Following line produced more than one subnet: {first}, {second}, ...\n'{line}'")]
    MultipleBlocks {
        line: String,
        first: String,
        second: String,
    },
}

impl CidrError {
    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> CidrError {
        CidrError::Malformed {
            line: line.trim().to_string(),
            reason: reason.into(),
        }
    }
}
