//! Exact address counts.
//!
//! A `/0` IPv6 block holds `2^128` addresses, one more than `u128` can hold, and
//! conservation checks sum many such sizes. [`AddressCount`] keeps the overflow
//! in a second word.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Number of addresses, `high * 2^128 + low`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressCount {
    high: u128,
    low: u128,
}

impl AddressCount {
    pub const ZERO: AddressCount = AddressCount { high: 0, low: 0 };

    /// `2^exp` for `exp` in `0..=128`.
    pub fn pow2(exp: u32) -> AddressCount {
        assert!(exp <= 128, "AddressCount::pow2({exp}) exceeds 2^128");
        if exp == 128 {
            AddressCount { high: 1, low: 0 }
        } else {
            AddressCount {
                high: 0,
                low: 1u128 << exp,
            }
        }
    }

    /// Number of addresses in the inclusive span `[start, end]`.
    pub fn span(start: u128, end: u128) -> AddressCount {
        assert!(start <= end, "span start[{start}] > end[{end}]");
        AddressCount::from(end - start) + AddressCount::from(1)
    }

    /// The count as `u128`, if it fits.
    pub fn as_u128(&self) -> Option<u128> {
        if self.high == 0 {
            Some(self.low)
        } else {
            None
        }
    }
}

impl From<u128> for AddressCount {
    fn from(low: u128) -> Self {
        AddressCount { high: 0, low }
    }
}

impl Add for AddressCount {
    type Output = AddressCount;

    fn add(self, rhs: AddressCount) -> AddressCount {
        let (low, carry) = self.low.overflowing_add(rhs.low);
        AddressCount {
            high: self.high + rhs.high + carry as u128,
            low,
        }
    }
}

impl AddAssign for AddressCount {
    fn add_assign(&mut self, rhs: AddressCount) {
        *self = *self + rhs;
    }
}

impl Sum for AddressCount {
    fn sum<I: Iterator<Item = AddressCount>>(iter: I) -> AddressCount {
        iter.fold(AddressCount::ZERO, |acc, c| acc + c)
    }
}

impl fmt::Display for AddressCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.high == 0 {
            return write!(f, "{}", self.low);
        }
        // 256-bit value as four big-endian u64 limbs, peeled off in base 10^19.
        const CHUNK: u128 = 10_000_000_000_000_000_000;
        let mut limbs = [
            (self.high >> 64) as u64,
            self.high as u64,
            (self.low >> 64) as u64,
            self.low as u64,
        ];
        let mut chunks = Vec::new();
        while limbs.iter().any(|&l| l != 0) {
            let mut rem: u128 = 0;
            for limb in limbs.iter_mut() {
                let cur = (rem << 64) | *limb as u128;
                *limb = (cur / CHUNK) as u64;
                rem = cur % CHUNK;
            }
            chunks.push(rem as u64);
        }
        let mut out = String::new();
        for (i, chunk) in chunks.iter().rev().enumerate() {
            if i == 0 {
                out.push_str(&chunk.to_string());
            } else {
                out.push_str(&format!("{chunk:019}"));
            }
        }
        f.pad(&out)
    }
}
