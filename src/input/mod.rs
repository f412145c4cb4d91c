//! Input parsing.
//!
//! - [`line`] - one text line into CIDR blocks
//! - [`file`] - text and JSON range files

mod file;
mod line;

pub use file::{parse_lines, read_ranges, Ranges};
pub use line::{parse_line, parse_single_block, Block, ParsedLine};
