//! Reading range files.
//!
//! Text files hold one range per line. Files ending in `.json` hold an array
//! of the same line strings.

use super::line::{parse_line, ParsedLine};
use crate::models::{Cidr4, Cidr6};
use std::error::Error;
use std::path::Path;

/// Blocks read from an input, split by family.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ranges {
    pub v4: Vec<Cidr4>,
    pub v6: Vec<Cidr6>,
    /// Number of IPv4 input lines.
    pub lines_v4: usize,
    /// Number of IPv6 input lines.
    pub lines_v6: usize,
}

impl Ranges {
    pub fn add_line(&mut self, parsed: ParsedLine) {
        match parsed {
            ParsedLine::V4(blocks) => {
                self.lines_v4 += 1;
                self.v4.extend(blocks);
            }
            ParsedLine::V6(blocks) => {
                self.lines_v6 += 1;
                self.v6.extend(blocks);
            }
        }
    }
}

/// Read and parse every line of `path`.
///
/// # Returns
/// * `Ok(Ranges)` - all blocks of the file
/// * `Err` - if the file is missing, unreadable, or a line is malformed
pub fn read_ranges(path: &str) -> Result<Ranges, Box<dyn Error>> {
    if !Path::new(path).exists() {
        return Err(format!("Input file does not exist: {path}").into());
    }
    log::info!("Loading {path}...");
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading input file {path}: {e}"))?;

    if path.ends_with(".json") {
        let lines = read_json_lines(&content).map_err(|e| format!("{path}: {e}"))?;
        parse_lines(lines.iter().map(String::as_str), path)
    } else {
        parse_lines(content.lines(), path)
    }
}

/// Parse lines from any source; `source` names it in error messages.
pub fn parse_lines<'a, I>(lines: I, source: &str) -> Result<Ranges, Box<dyn Error>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ranges = Ranges::default();
    for (i, line) in lines.into_iter().enumerate() {
        let parsed = parse_line(line).map_err(|e| {
            log::error!("{source}:{}: {e}", i + 1);
            format!("Unprocessed line {source}:{}: {e}", i + 1)
        })?;
        if let Some(parsed) = parsed {
            ranges.add_line(parsed);
        }
    }
    log::info!(
        "{source}: {} IPv4 lines ({} subnets), {} IPv6 lines ({} subnets)",
        ranges.lines_v4,
        ranges.v4.len(),
        ranges.lines_v6,
        ranges.v6.len()
    );
    Ok(ranges)
}

fn read_json_lines(json: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let lines: Vec<String> = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing JSON: path={} error={}", e.path(), e))?;
    Ok(lines)
}
