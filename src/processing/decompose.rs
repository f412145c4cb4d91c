//! Range decomposition.
//!
//! Turns an inclusive `[start, end]` address range into the fewest aligned
//! CIDR blocks covering exactly that range.

use crate::models::{bit_length, lo_mask, low_bits, AddressCount, AddressFamily, Cidr};

/// Decompose the inclusive range `[start, end]` into ascending aligned blocks.
///
/// # Panics
/// * If `start > end` or `end` does not fit the family. Callers establish both.
pub fn decompose<F: AddressFamily>(start: u128, end: u128) -> Vec<Cidr<F>> {
    assert!(
        start <= end,
        "decompose start[{}] > end[{}] should never happen.",
        F::from_bits(start),
        F::from_bits(end)
    );
    assert!(
        end <= F::max_bits(),
        "decompose end[{end:#x}] exceeds {} bits",
        F::BITS
    );

    if let Some(block) = single_block::<F>(start, end) {
        return vec![block];
    }
    log::trace!(
        "decompose {} - {}: not a single subnet",
        F::from_bits(start),
        F::from_bits(end)
    );

    let mut blocks = Vec::new();
    let mut p = start;

    // Grow: take the biggest block the alignment of `p` allows while it still fits.
    loop {
        let length = lo_mask::<F>(p);
        let host = low_bits((F::BITS - length) as u32);
        if host > end - p {
            break;
        }
        blocks.push(Cidr::raw(p, length));
        let last = p + host;
        if last == end {
            debug_assert!(covers_exactly(start, end, &blocks));
            return blocks;
        }
        p = last + 1;
    }

    // Shrink: the largest power of two not exceeding what is left. `p` is
    // aligned to a bigger size than any chosen here, so every block stays aligned.
    loop {
        // `p > 0` or `end < max` here, so the remaining count cannot overflow.
        let remaining = end - p + 1;
        let host_bits = bit_length(remaining) - 1;
        blocks.push(Cidr::raw(p, F::BITS - host_bits as u8));
        let last = p + low_bits(host_bits);
        if last == end {
            break;
        }
        p = last + 1;
    }

    debug_assert!(covers_exactly(start, end, &blocks));
    blocks
}

/// [`decompose`] taking addresses of the family.
pub fn decompose_addrs<F: AddressFamily>(start: F::Addr, end: F::Addr) -> Vec<Cidr<F>> {
    decompose::<F>(F::to_bits(start), F::to_bits(end))
}

/// The single block spanning `[start, end]`, if the range is one aligned block.
pub fn single_block<F: AddressFamily>(start: u128, end: u128) -> Option<Cidr<F>> {
    let diff = start ^ end;
    let diff_len = bit_length(diff);
    if start & end == start && low_bits(diff_len) == diff {
        Some(Cidr::raw(start, F::BITS - diff_len as u8))
    } else {
        None
    }
}

/// True when `blocks` are normalized, ascending, gap and overlap free, and
/// cover exactly `[start, end]` with a matching address count.
pub fn covers_exactly<F: AddressFamily>(start: u128, end: u128, blocks: &[Cidr<F>]) -> bool {
    let Some(first) = blocks.first() else {
        return false;
    };
    if first.prefix() != start || !blocks.iter().all(|b| b.is_normalized()) {
        return false;
    }
    for pair in blocks.windows(2) {
        if pair[0].next_address() != Some(pair[1].prefix()) {
            return false;
        }
    }
    let total: AddressCount = blocks.iter().map(|b| b.size()).sum();
    blocks.last().map(|b| b.last_address()) == Some(end) && total == AddressCount::span(start, end)
}
