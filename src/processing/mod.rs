//! Range processing logic.
//!
//! This module contains the algorithms of the crate:
//! - [`decompose`] - inclusive address range into aligned CIDR blocks
//! - [`aggregate`] - sorted blocks into the smallest equivalent list
//! - [`pipeline`] - per-family sort, de-duplication and aggregation

mod aggregate;
mod decompose;
mod pipeline;

// Re-export public functions
pub use aggregate::{aggregate, total_size};
pub use decompose::{covers_exactly, decompose, decompose_addrs, single_block};
pub use pipeline::{aggregate_family, aggregate_ranges, Aggregated, FamilySummary, Summary};
