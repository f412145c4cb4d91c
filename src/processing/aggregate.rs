//! Subnet aggregation.
//!
//! Repeats merge passes over a sorted block list until no two sibling blocks
//! remain, giving the smallest list covering the same addresses.

use crate::error::CidrError;
use crate::models::{AddressCount, AddressFamily, Cidr};

/// Aggregate sorted, non-overlapping blocks into the smallest equivalent list.
///
/// Blocks are normalized first. Overlapping neighbours are reported as
/// [`CidrError::Overlap`].
///
/// # Panics
/// * If the blocks are not sorted ascending by prefix.
pub fn aggregate<F: AddressFamily>(blocks: Vec<Cidr<F>>) -> Result<Vec<Cidr<F>>, CidrError> {
    let mut subnets: Vec<Cidr<F>> = blocks.iter().map(|b| b.normalized()).collect();
    check_sorted_disjoint(&subnets)?;

    let input_len = subnets.len();
    let mut pass = 0;
    loop {
        pass += 1;
        let before = total_size(&subnets);
        let (merged_subnets, merges) = merge_pass(&subnets);
        let after = total_size(&merged_subnets);
        if before != after {
            return Err(CidrError::CountMismatch {
                pass,
                before,
                after,
            });
        }
        log::debug!(
            "{} pass {pass}: {merges} merges, reduced to {}",
            F::NAME,
            merged_subnets.len()
        );
        subnets = merged_subnets;
        if merges == 0 {
            break;
        }
    }

    log::info!(
        "{} aggregated {input_len} -> {} subnets in {pass} passes",
        F::NAME,
        subnets.len()
    );
    Ok(subnets)
}

/// One left-to-right pass. A block that fails to merge with its right
/// neighbour is kept, and the neighbour gets its own chance with the next one.
fn merge_pass<F: AddressFamily>(subnets: &[Cidr<F>]) -> (Vec<Cidr<F>>, usize) {
    let mut merged_subnets = Vec::with_capacity(subnets.len());
    let mut merges = 0;
    let mut i = 0;
    while i < subnets.len() {
        let a = subnets[i];
        match subnets.get(i + 1).and_then(|b| a.merge_with(b)) {
            Some(merged) => {
                merged_subnets.push(merged);
                merges += 1;
                i += 2;
            }
            None => {
                merged_subnets.push(a);
                i += 1;
            }
        }
    }
    (merged_subnets, merges)
}

/// Total number of addresses covered by `blocks`.
pub fn total_size<F: AddressFamily>(blocks: &[Cidr<F>]) -> AddressCount {
    blocks.iter().map(|b| b.size()).sum()
}

fn check_sorted_disjoint<F: AddressFamily>(subnets: &[Cidr<F>]) -> Result<(), CidrError> {
    for pair in subnets.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.prefix() <= b.prefix(),
            "subnets not sorted: {a} before {b} should never happen."
        );
        if b.first_address() <= a.last_address() {
            return Err(CidrError::Overlap {
                first: a.to_string(),
                second: b.to_string(),
            });
        }
    }
    Ok(())
}
