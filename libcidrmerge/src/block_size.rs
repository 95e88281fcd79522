use std::fmt;

use num_bigint::BigUint;

use crate::family::Family;
use crate::uint128::Uint128;


/// A number of addresses, wide enough for the largest block of its address family.
///
/// An IPv4 block holds at most 2^32 addresses, which fits into a machine word. An IPv6 block holds
/// up to 2^128 addresses, which does not fit into any native integer type, so it is counted with an
/// arbitrary-precision integer. The variant is chosen once by [`BlockSize::zero`] and all
/// arithmetic is performed between values of the same variant.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum BlockSize {
    Small(u64),
    Big(BigUint),
}

impl BlockSize {
    /// Returns a zero count suitable for the given address family.
    pub fn zero(family: Family) -> BlockSize {
        match family {
            Family::Ipv4 => BlockSize::Small(0),
            Family::Ipv6 => BlockSize::Big(BigUint::from(0u32)),
        }
    }

    /// Returns the number of addresses in the inclusive interval from `first` to `last`.
    ///
    /// Returns `None` if `last` lies before `first`.
    pub fn span(first: Uint128, last: Uint128, family: Family) -> Option<BlockSize> {
        let diff = last.subtract(&first)?;
        match family {
            Family::Ipv4 => {
                if diff.top_half() != 0 {
                    return None;
                }
                diff.bottom_half().checked_add(1).map(BlockSize::Small)
            },
            Family::Ipv6 => {
                let diff_big = BigUint::from(u128::from(diff));
                Some(BlockSize::Big(diff_big + 1u32))
            },
        }
    }

    /// Returns this count with the given bit set.
    ///
    /// # Panics
    ///
    /// Panics if `bit` does not fit into the small representation; the largest bit required for
    /// IPv4 is bit 32.
    pub fn with_bit(&self, bit: usize) -> BlockSize {
        match self {
            BlockSize::Small(n) => {
                assert!(bit < 64, "bit {} does not fit into a small block size", bit);
                BlockSize::Small(n | (1u64 << bit))
            },
            BlockSize::Big(n) => {
                let mut ret = n.clone();
                ret |= BigUint::from(1u32) << bit;
                BlockSize::Big(ret)
            },
        }
    }

    /// Subtracts another count from this one. Returns `None` if the result would be negative or if
    /// the counts belong to different address families.
    pub fn checked_sub(&self, other: &BlockSize) -> Option<BlockSize> {
        match (self, other) {
            (BlockSize::Small(a), BlockSize::Small(b)) => a.checked_sub(*b).map(BlockSize::Small),
            (BlockSize::Big(a), BlockSize::Big(b)) => {
                if a >= b {
                    Some(BlockSize::Big(a - b))
                } else {
                    None
                }
            },
            _ => None,
        }
    }

    /// Adds another count to this one. Returns `None` if the counts belong to different address
    /// families or the small representation overflows.
    pub fn checked_add(&self, other: &BlockSize) -> Option<BlockSize> {
        match (self, other) {
            (BlockSize::Small(a), BlockSize::Small(b)) => a.checked_add(*b).map(BlockSize::Small),
            (BlockSize::Big(a), BlockSize::Big(b)) => Some(BlockSize::Big(a + b)),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            BlockSize::Small(n) => *n == 0,
            BlockSize::Big(n) => n.bits() == 0,
        }
    }

    pub fn to_biguint(&self) -> BigUint {
        match self {
            BlockSize::Small(n) => BigUint::from(*n),
            BlockSize::Big(n) => n.clone(),
        }
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockSize::Small(n) => write!(f, "{}", n),
            BlockSize::Big(n) => write!(f, "{}", n),
        }
    }
}
