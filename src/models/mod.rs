//! Domain models for address range aggregation.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`AddressFamily`] with [`V4`] and [`V6`] - fixed-width address families
//! - [`Cidr`] - a `prefix/length` block within one family
//! - [`AddressCount`] - exact address counts up to and past `2^128`

mod cidr;
mod count;
mod family;

// Re-export public types
pub use cidr::{broadcast_addr, cut_addr, get_cidr_mask, lo_mask, Cidr, Cidr4, Cidr6};
pub use count::AddressCount;
pub use family::{bit_length, low_bits, AddressFamily, V4, V6};

#[cfg(test)]
pub(crate) use family::Tiny;
