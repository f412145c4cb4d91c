//! Address families.
//!
//! An [`AddressFamily`] fixes the bit width of every address and block computed
//! in it. Addresses are carried as `u128` regardless of family, with only the
//! low [`AddressFamily::BITS`] bits ever set.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// A fixed-width address family.
pub trait AddressFamily:
    Copy + Clone + Debug + Default + PartialEq + Eq + PartialOrd + Ord + Hash + Send + Sync + 'static
{
    /// Width of an address in bits.
    const BITS: u8;
    /// Short name used in logs and reports.
    const NAME: &'static str;
    /// The std address type for this family.
    type Addr: Copy + Debug + Display + FromStr + PartialEq + Send;

    fn to_bits(addr: Self::Addr) -> u128;
    fn from_bits(bits: u128) -> Self::Addr;

    /// Largest address of the family, all `BITS` bits set.
    fn max_bits() -> u128 {
        low_bits(Self::BITS as u32)
    }
}

/// IPv4, 32 bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct V4;

/// IPv6, 128 bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct V6;

impl AddressFamily for V4 {
    const BITS: u8 = 32;
    const NAME: &'static str = "IPv4";
    type Addr = Ipv4Addr;

    fn to_bits(addr: Ipv4Addr) -> u128 {
        u32::from(addr) as u128
    }

    fn from_bits(bits: u128) -> Ipv4Addr {
        Ipv4Addr::from(bits as u32)
    }
}

impl AddressFamily for V6 {
    const BITS: u8 = 128;
    const NAME: &'static str = "IPv6";
    type Addr = Ipv6Addr;

    fn to_bits(addr: Ipv6Addr) -> u128 {
        u128::from(addr)
    }

    fn from_bits(bits: u128) -> Ipv6Addr {
        Ipv6Addr::from(bits)
    }
}

/// Value with the lowest `n` bits set. Saturates at `u128::MAX` for `n >= 128`.
pub fn low_bits(n: u32) -> u128 {
    if n >= 128 {
        u128::MAX
    } else {
        (1u128 << n) - 1
    }
}

/// Number of significant bits in `x`, zero for zero.
pub fn bit_length(x: u128) -> u32 {
    128 - x.leading_zeros()
}

/// An 8-bit family, small enough to check every range exhaustively.
#[cfg(test)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Tiny;

#[cfg(test)]
impl AddressFamily for Tiny {
    const BITS: u8 = 8;
    const NAME: &'static str = "tiny";
    type Addr = u8;

    fn to_bits(addr: u8) -> u128 {
        addr as u128
    }

    fn from_bits(bits: u128) -> u8 {
        bits as u8
    }
}
