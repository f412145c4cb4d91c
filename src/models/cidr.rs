//! CIDR blocks generic over the address family.
//!
//! Provides [`Cidr`] for a `(prefix, length)` pair along with the mask and
//! boundary helpers used by the decomposer and the aggregator.

use super::count::AddressCount;
use super::family::{low_bits, AddressFamily, V4, V6};
use crate::error::CidrError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Convert a prefix length to a network mask with the top `len` of `F::BITS` bits set.
///
/// # Examples
/// ```
/// use cidr_aggregate::models::{get_cidr_mask, V4};
/// assert_eq!(get_cidr_mask::<V4>(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask<F: AddressFamily>(len: u8) -> Result<u128, CidrError> {
    if len > F::BITS {
        Err(CidrError::LengthOutOfRange {
            length: len,
            max: F::BITS,
        })
    } else {
        let right_len = (F::BITS - len) as u32;
        Ok(F::max_bits() & !low_bits(right_len))
    }
}

/// Get the network address bits for `addr` under a prefix length.
pub fn cut_addr<F: AddressFamily>(addr: u128, len: u8) -> Result<u128, CidrError> {
    Ok(addr & get_cidr_mask::<F>(len)?)
}

/// Calculate the last (broadcast) address bits for `addr` under a prefix length.
pub fn broadcast_addr<F: AddressFamily>(addr: u128, len: u8) -> Result<u128, CidrError> {
    let mask = get_cidr_mask::<F>(len)?;
    Ok((addr & mask) | (F::max_bits() & !mask))
}

/// Longest prefix length a block starting at `addr` must have to stay aligned.
///
/// Zero is aligned to every size, so it yields `/0`.
pub fn lo_mask<F: AddressFamily>(addr: u128) -> u8 {
    let trailing_zeros = addr.trailing_zeros().min(F::BITS as u32) as u8;
    F::BITS - trailing_zeros
}

/// A block of addresses written as `prefix/length`.
///
/// The prefix may carry host bits until [`Cidr::normalized`] clears them.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cidr<F: AddressFamily> {
    prefix: u128,
    length: u8,
    family: PhantomData<F>,
}

pub type Cidr4 = Cidr<V4>;
pub type Cidr6 = Cidr<V6>;

impl<F: AddressFamily> Cidr<F> {
    /// Create a block, rejecting lengths over `F::BITS` and prefixes wider than the family.
    pub fn new(prefix: u128, length: u8) -> Result<Cidr<F>, CidrError> {
        if length > F::BITS {
            return Err(CidrError::LengthOutOfRange {
                length,
                max: F::BITS,
            });
        }
        if prefix > F::max_bits() {
            return Err(CidrError::PrefixOutOfRange {
                prefix,
                bits: F::BITS,
            });
        }
        Ok(Cidr::raw(prefix, length))
    }

    pub fn from_addr(addr: F::Addr, length: u8) -> Result<Cidr<F>, CidrError> {
        Cidr::new(F::to_bits(addr), length)
    }

    /// Single-address block, `/BITS`.
    pub fn host(addr: F::Addr) -> Cidr<F> {
        Cidr::raw(F::to_bits(addr), F::BITS)
    }

    /// Caller guarantees `length <= F::BITS` and `prefix <= F::max_bits()`.
    pub(crate) fn raw(prefix: u128, length: u8) -> Cidr<F> {
        debug_assert!(length <= F::BITS && prefix <= F::max_bits());
        Cidr {
            prefix,
            length,
            family: PhantomData,
        }
    }

    pub fn prefix(&self) -> u128 {
        self.prefix
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    /// Prefix as an address of the family.
    pub fn network(&self) -> F::Addr {
        F::from_bits(self.prefix)
    }

    fn host_bits(&self) -> u32 {
        (F::BITS - self.length) as u32
    }

    /// Network mask: the top `length` bits set, rest zero.
    pub fn mask(&self) -> u128 {
        F::max_bits() & !low_bits(self.host_bits())
    }

    pub fn normalized(&self) -> Cidr<F> {
        Cidr::raw(self.prefix & self.mask(), self.length)
    }

    pub fn is_normalized(&self) -> bool {
        self.prefix & !self.mask() == 0
    }

    /// Number of addresses covered.
    pub fn size(&self) -> AddressCount {
        AddressCount::pow2(self.host_bits())
    }

    /// First address of the block.
    pub fn first_address(&self) -> u128 {
        self.prefix & self.mask()
    }

    /// Last address of the block, inclusive.
    pub fn last_address(&self) -> u128 {
        self.first_address() | low_bits(self.host_bits())
    }

    /// First address right after the block.
    ///
    /// `None` when the block reaches the top of the address space.
    pub fn next_address(&self) -> Option<u128> {
        let last = self.last_address();
        if last == F::max_bits() {
            None
        } else {
            Some(last + 1)
        }
    }

    /// Highest address of the block as an address of the family.
    pub fn broadcast(&self) -> F::Addr {
        F::from_bits(self.last_address())
    }

    pub fn contains_address(&self, addr: u128) -> bool {
        self.first_address() <= addr && addr <= self.last_address()
    }

    pub fn contains_addr(&self, addr: F::Addr) -> bool {
        self.contains_address(F::to_bits(addr))
    }

    /// True when every address of `other` is also in `self`.
    pub fn contains(&self, other: &Cidr<F>) -> bool {
        self.size() >= other.size()
            && self.contains_address(other.first_address())
            && self.contains_address(other.last_address())
    }

    /// Smallest block strictly containing this one, `None` for `/0`.
    pub fn parent(&self) -> Option<Cidr<F>> {
        if self.length == 0 {
            None
        } else {
            Some(Cidr::raw(self.prefix, self.length - 1).normalized())
        }
    }

    /// Combine two sibling halves into their parent block.
    ///
    /// Only blocks of the same length merge. Blocks of different lengths never
    /// merge, even when one contains the other, and a block does not merge with
    /// itself.
    pub fn merge_with(&self, other: &Cidr<F>) -> Option<Cidr<F>> {
        if self.length != other.length {
            return None;
        }
        if self.normalized() == other.normalized() {
            return None;
        }
        let x = self.parent()?;
        let y = other.parent()?;
        if x == y {
            Some(x)
        } else {
            None
        }
    }
}

impl<F: AddressFamily> Ord for Cidr<F> {
    fn cmp(&self, other: &Cidr<F>) -> Ordering {
        self.prefix
            .cmp(&other.prefix)
            .then(self.length.cmp(&other.length))
    }
}

impl<F: AddressFamily> PartialOrd for Cidr<F> {
    fn partial_cmp(&self, other: &Cidr<F>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: AddressFamily> fmt::Display for Cidr<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.length)
    }
}

impl<F: AddressFamily> fmt::Debug for Cidr<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", F::NAME, self)
    }
}

impl<F: AddressFamily> FromStr for Cidr<F> {
    type Err = CidrError;

    /// Parse `address/length`, e.g. "10.0.0.0/24". Host bits are kept as written.
    fn from_str(addr_cidr: &str) -> Result<Cidr<F>, CidrError> {
        let addr_cidr = addr_cidr.trim();
        let parts: Vec<&str> = addr_cidr.split('/').collect();
        if parts.len() != 2 {
            return Err(CidrError::malformed(addr_cidr, "expected address/length"));
        }
        let addr: F::Addr = parts[0].parse().map_err(|_| {
            CidrError::malformed(addr_cidr, format!("invalid {} address {}", F::NAME, parts[0]))
        })?;
        let length: u8 = parts[1].parse().map_err(|_| {
            CidrError::malformed(addr_cidr, format!("invalid length {}", parts[1]))
        })?;
        Cidr::from_addr(addr, length)
    }
}

impl<F: AddressFamily> Serialize for Cidr<F> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de, F: AddressFamily> Deserialize<'de> for Cidr<F> {
    fn deserialize<D>(deserializer: D) -> Result<Cidr<F>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e: CidrError| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}
