// cargo watch -x 'fmt' -x 'test'

pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod output;
pub mod processing;

use std::error::Error;

pub use config::Config;
pub use error::CidrError;
pub use models::{AddressCount, AddressFamily, Cidr, Cidr4, Cidr6, V4, V6};
pub use processing::{aggregate, decompose, decompose_addrs, Aggregated, Summary};

/// Read a range file and aggregate both families of it.
pub async fn aggregate_file(input: &str) -> Result<(Aggregated, Summary), Box<dyn Error>> {
    let ranges = input::read_ranges(input)?;
    processing::aggregate_ranges(ranges).await
}

/// Full run: read, aggregate, write the result file and print the report.
pub async fn run(config: &Config) -> Result<Summary, Box<dyn Error>> {
    log::info!("#Start run() {} -> {}", config.input, config.output);
    let (aggregated, summary) = aggregate_file(&config.input).await?;
    output::write_blocks(&config.output, &aggregated, config.format)?;
    output::print_summary(&summary);
    Ok(summary)
}
