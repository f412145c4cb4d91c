//! Per-family pipeline.
//!
//! Sorts and de-duplicates the blocks of one family before aggregating them.
//! IPv4 and IPv6 share nothing, so both run at the same time.

use super::aggregate::{aggregate, total_size};
use crate::error::CidrError;
use crate::input::Ranges;
use crate::models::{AddressCount, AddressFamily, Cidr, Cidr4, Cidr6, V4, V6};
use std::error::Error;

/// Aggregated blocks of both families.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Aggregated {
    pub v4: Vec<Cidr4>,
    pub v6: Vec<Cidr6>,
}

/// Reduction figures for one family.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySummary {
    pub family: &'static str,
    /// Input lines of this family.
    pub lines: usize,
    /// Blocks before aggregation.
    pub input_subnets: usize,
    /// Blocks after aggregation.
    pub output_subnets: usize,
    /// Addresses covered by the output.
    pub addresses: AddressCount,
}

impl FamilySummary {
    fn new<F: AddressFamily>(lines: usize, input_subnets: usize, output: &[Cidr<F>]) -> Self {
        FamilySummary {
            family: F::NAME,
            lines,
            input_subnets,
            output_subnets: output.len(),
            addresses: total_size(output),
        }
    }

    /// Output blocks as a percentage of input lines, `None` without input.
    pub fn reduction_percent(&self) -> Option<f64> {
        if self.lines == 0 {
            None
        } else {
            Some(100.0 * self.output_subnets as f64 / self.lines as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub v4: FamilySummary,
    pub v6: FamilySummary,
}

/// Normalize, sort and de-duplicate `blocks`, then aggregate them.
pub fn aggregate_family<F: AddressFamily>(blocks: Vec<Cidr<F>>) -> Result<Vec<Cidr<F>>, CidrError> {
    let mut subnets: Vec<Cidr<F>> = blocks.iter().map(|b| b.normalized()).collect();
    subnets.sort();
    let before = subnets.len();
    subnets.dedup();
    if subnets.len() != before {
        log::warn!(
            "{} dropped {} duplicate subnets",
            F::NAME,
            before - subnets.len()
        );
    }
    aggregate(subnets)
}

/// Aggregate both families of `ranges` concurrently.
///
/// # Returns
/// * `Ok((Aggregated, Summary))` - the blocks and their reduction figures
/// * `Err` - if a family has overlapping blocks or a task fails
pub async fn aggregate_ranges(ranges: Ranges) -> Result<(Aggregated, Summary), Box<dyn Error>> {
    let Ranges {
        v4,
        v6,
        lines_v4,
        lines_v6,
    } = ranges;
    let (input_v4, input_v6) = (v4.len(), v6.len());
    log::info!("Aggregating...");

    let task_v4 = tokio::task::spawn_blocking(move || aggregate_family::<V4>(v4));
    let task_v6 = tokio::task::spawn_blocking(move || aggregate_family::<V6>(v6));
    let (v4, v6) = futures::try_join!(task_v4, task_v6)
        .map_err(|e| format!("Aggregation task failed: {e}"))?;
    let v4 = v4.map_err(|e| format!("IPv4: {e}"))?;
    let v6 = v6.map_err(|e| format!("IPv6: {e}"))?;

    let summary = Summary {
        v4: FamilySummary::new(lines_v4, input_v4, &v4),
        v6: FamilySummary::new(lines_v6, input_v6, &v6),
    };
    Ok((Aggregated { v4, v6 }, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_lines;

    fn v4(list: &[&str]) -> Vec<Cidr4> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_aggregate_family_sorts_and_dedups() {
        let result = aggregate_family(v4(&[
            "192.168.1.0/24",
            "192.168.0.0/24",
            "192.168.1.7/24",
            "10.0.0.0/8",
        ]))
        .unwrap();
        let strings: Vec<String> = result.iter().map(|b| b.to_string()).collect();
        assert_eq!(strings, vec!["10.0.0.0/8", "192.168.0.0/23"]);
    }

    #[test]
    fn test_aggregate_family_overlap() {
        let err = aggregate_family(v4(&["10.1.0.0/16", "10.0.0.0/8"])).unwrap_err();
        assert!(matches!(err, CidrError::Overlap { .. }));
    }

    #[test]
    fn test_reduction_percent() {
        let summary = FamilySummary {
            family: "IPv4",
            lines: 8,
            input_subnets: 10,
            output_subnets: 2,
            addresses: AddressCount::from(512),
        };
        assert_eq!(summary.reduction_percent(), Some(25.0));
        let empty = FamilySummary {
            lines: 0,
            ..summary
        };
        assert_eq!(empty.reduction_percent(), None);
    }

    #[tokio::test]
    async fn test_aggregate_ranges() {
        let ranges = parse_lines(
            [
                "192.168.0.0/24",
                "192.168.1.0,192.168.1.255",
                "2a03:6921:2::/48",
                "2a03:6921:3::/48",
            ],
            "inline",
        )
        .unwrap();
        let (aggregated, summary) = aggregate_ranges(ranges).await.unwrap();
        assert_eq!(aggregated.v4, v4(&["192.168.0.0/23"]));
        assert_eq!(aggregated.v6.len(), 1);
        assert_eq!(aggregated.v6[0].to_string(), "2a03:6921:2::/47");
        assert_eq!(summary.v4.lines, 2);
        assert_eq!(summary.v4.output_subnets, 1);
        assert_eq!(summary.v4.addresses, AddressCount::from(512));
        assert_eq!(summary.v6.input_subnets, 2);
    }

    #[tokio::test]
    async fn test_aggregate_ranges_overlap_names_family() {
        let ranges = parse_lines(["10.0.0.0/8", "10.1.0.0/16"], "inline").unwrap();
        let err = aggregate_ranges(ranges).await.unwrap_err();
        assert!(err.to_string().starts_with("IPv4: Overlapping blocks"), "got {err}");
    }
}
