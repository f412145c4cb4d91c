//! Output formatting for aggregated blocks.
//!
//! This module handles formatting and outputting results:
//! - [`text`] - text and JSON result files
//! - [`terminal`] - reduction report with colors

mod terminal;
mod text;

pub use terminal::{format_field, print_summary, summary_row};
pub use text::{format_blocks, write_blocks, OutputFormat};
