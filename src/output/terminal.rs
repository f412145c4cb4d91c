//! Terminal output utilities.
//!
//! Provides formatting helpers and the reduction report printed after a run.

use crate::processing::{FamilySummary, Summary};
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// One report row per family, `None` for a family without input.
pub fn summary_row(s: &FamilySummary) -> Option<String> {
    let percent = s.reduction_percent()?;
    Some(format!(
        "{family},{lines},{input},{output},{percent},{addresses}",
        family = format_field(s.family, 6),
        lines = format_field(s.lines, 10),
        input = format_field(s.input_subnets, 10),
        output = format_field(s.output_subnets, 10),
        percent = format_field(format!("{percent:.2}%"), 10),
        addresses = format_field(s.addresses, 42),
    ))
}

/// Print original and aggregated counts for both families.
pub fn print_summary(summary: &Summary) {
    println!(
        r#""family",   "lines", "subnets", "aggregated", "ratio",                           "addresses""#
    );
    for s in [&summary.v4, &summary.v6] {
        match summary_row(s) {
            Some(row) => println!("{row}"),
            None => println!(
                "#{}# no {} ranges in input",
                "NOTE".on_blue(),
                s.family
            ),
        }
    }
}
