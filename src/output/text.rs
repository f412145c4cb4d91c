//! Writing aggregated blocks to a file.

use crate::processing::Aggregated;
use itertools::Itertools;
use std::error::Error;
use std::str::FromStr;

/// File format of the aggregated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `address/length` per line.
    #[default]
    Text,
    /// A JSON array of `address/length` strings.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<OutputFormat, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {other}")),
        }
    }
}

/// Render blocks, IPv4 first then IPv6.
pub fn format_blocks(blocks: &Aggregated, format: OutputFormat) -> Result<String, Box<dyn Error>> {
    let lines = blocks
        .v4
        .iter()
        .map(|b| b.to_string())
        .chain(blocks.v6.iter().map(|b| b.to_string()))
        .collect_vec();
    match format {
        OutputFormat::Text => Ok(lines.iter().map(|l| format!("{l}\n")).collect()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&lines)
                .map_err(|e| format!("Error serializing JSON: {e}"))?;
            Ok(json + "\n")
        }
    }
}

/// Write blocks to `path`.
pub fn write_blocks(path: &str, blocks: &Aggregated, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    let content = format_blocks(blocks, format)?;
    std::fs::write(path, content).map_err(|e| format!("Error writing output file {path}: {e}"))?;
    log::info!(
        "Aggregated ranges stored in {path} ({} IPv4, {} IPv6)",
        blocks.v4.len(),
        blocks.v6.len()
    );
    Ok(())
}
