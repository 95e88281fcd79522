use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ops::{BitAnd, BitOr, Not};

use crate::family::Family;


/// A 128-bit unsigned integer stored as two 64-bit halves.
///
/// IPv6 addresses occupy the whole value; IPv4 addresses are zero-extended and occupy only the
/// lowest 32 bits of the bottom half. The derived ordering compares the top halves first, then the
/// bottom halves, which is the numeric ordering.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Uint128 {
    top_half: u64,
    bottom_half: u64,
}

pub const UINT128_ZERO: Uint128 = Uint128 { top_half: 0, bottom_half: 0 };
pub const UINT128_MAX: Uint128 = Uint128 { top_half: u64::MAX, bottom_half: u64::MAX };

impl Uint128 {
    /// Constructs a new value from its two halves, where the top half contains the most significant
    /// bits (i.e. `0x0102030405060708_090a0b0c0d0e0f00` ->
    /// `Uint128::new(0x0102030405060708, 0x090a0b0c0d0e0f00)`).
    pub const fn new(
        top_half: u64,
        bottom_half: u64,
    ) -> Uint128 {
        Uint128 {
            top_half,
            bottom_half,
        }
    }

    pub fn top_half(&self) -> u64 { self.top_half }
    pub fn bottom_half(&self) -> u64 { self.bottom_half }

    /// Serializes this value into 16 bytes, most significant byte first.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut ret = [0u8; 16];
        ret[0..8].copy_from_slice(&self.top_half.to_be_bytes());
        ret[8..16].copy_from_slice(&self.bottom_half.to_be_bytes());
        ret
    }

    /// Deserializes a value from its big-endian byte representation. Four bytes are interpreted as
    /// an IPv4 address (zero-extended), sixteen bytes as an IPv6 address.
    ///
    /// Returns `None` if the byte sequence has any other length.
    pub fn from_bytes(bytes: &[u8]) -> Option<Uint128> {
        match bytes.len() {
            4 => {
                let four = <[u8; 4]>::try_from(bytes).ok()?;
                Some(Uint128::new(0, u32::from_be_bytes(four).into()))
            },
            16 => {
                let top = <[u8; 8]>::try_from(&bytes[0..8]).ok()?;
                let bottom = <[u8; 8]>::try_from(&bytes[8..16]).ok()?;
                Some(Uint128::new(u64::from_be_bytes(top), u64::from_be_bytes(bottom)))
            },
            _ => None,
        }
    }

    /// Returns whether this value is a valid address of the given family.
    pub fn fits(&self, family: Family) -> bool {
        match family {
            Family::Ipv4 => self.top_half == 0 && self.bottom_half <= u64::from(u32::MAX),
            Family::Ipv6 => true,
        }
    }

    /// Converts this value into an IP address of the given family. For IPv4, only the lowest 32
    /// bits are considered.
    pub fn to_ip(&self, family: Family) -> IpAddr {
        match family {
            Family::Ipv4 => {
                let low_bits = (self.bottom_half & 0xFFFF_FFFF) as u32;
                IpAddr::V4(Ipv4Addr::from(low_bits))
            },
            Family::Ipv6 => IpAddr::V6(Ipv6Addr::from(self.to_bytes())),
        }
    }

    /// Shifts this value left by one bit, carrying the top bit of the bottom half into the top
    /// half. The top bit of the top half is lost.
    pub fn left_shift(&self) -> Uint128 {
        let mut top_half = self.top_half << 1;
        if self.bottom_half & 0x8000_0000_0000_0000 != 0 {
            top_half |= 1;
        }
        Uint128::new(top_half, self.bottom_half << 1)
    }

    /// Returns the last value of the block that starts at this value and whose size is given by the
    /// complement of `mask`.
    pub fn range_end(&self, mask: Uint128) -> Uint128 {
        *self | !mask
    }

    /// Returns the first value after the block that starts at this value and whose size is given by
    /// the complement of `mask`.
    ///
    /// Returns `None` if the block extends to the end of the 128-bit space.
    pub fn next_range_begin(&self, mask: Uint128) -> Option<Uint128> {
        let end = self.range_end(mask);
        Uint128::add_internal(end.top_half, end.bottom_half, 0, 1)
    }

    /// Steps past the block that starts at this value and is described by `mask`; the same as
    /// [`Uint128::next_range_begin`].
    pub fn jump(&self, mask: Uint128) -> Option<Uint128> {
        self.next_range_begin(mask)
    }

    /// Interprets this value as a subnet mask within an address of `width` bits and returns the
    /// corresponding CIDR prefix, i.e. `width` minus the number of trailing zero bits (bounded at
    /// zero).
    pub fn mask_prefix_len(&self, width: usize) -> usize {
        let trailing_zeros: usize = if self.bottom_half != 0 {
            self.bottom_half.trailing_zeros() as usize
        } else {
            self.top_half.trailing_zeros() as usize + 64
        };

        if trailing_zeros >= width {
            0
        } else {
            width - trailing_zeros
        }
    }

    /// Returns the sum (with carry) of this and another value. Returns `None` if the addition
    /// overflows.
    pub fn add(&self, other: &Uint128) -> Option<Uint128> {
        Uint128::add_internal(self.top_half, self.bottom_half, other.top_half, other.bottom_half)
    }

    /// Returns the difference (with borrow) between this and another value. Returns `None` if the
    /// subtraction underflows.
    pub fn subtract(&self, other: &Uint128) -> Option<Uint128> {
        let (bot_diff, is_borrow) = self.bottom_half.overflowing_sub(other.bottom_half);

        let mut top_diff = self.top_half.checked_sub(other.top_half)?;
        if is_borrow {
            top_diff = top_diff.checked_sub(1)?;
        }
        Some(Uint128::new(top_diff, bot_diff))
    }

    fn add_internal(addrtop64: u64, addrbot64: u64, offtop64: u64, offbot64: u64) -> Option<Uint128> {
        let (bot_sum, is_carry) = addrbot64.overflowing_add(offbot64);

        let mut top_sum = addrtop64.checked_add(offtop64)?;
        if is_carry {
            top_sum = top_sum.checked_add(1)?;
        }
        Some(Uint128::new(top_sum, bot_sum))
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Uint128::new((value >> 64) as u64, value as u64)
    }
}

impl From<Uint128> for u128 {
    fn from(value: Uint128) -> Self {
        (u128::from(value.top_half) << 64) | u128::from(value.bottom_half)
    }
}

impl From<Ipv4Addr> for Uint128 {
    fn from(addr: Ipv4Addr) -> Self {
        Uint128::new(0, u32::from(addr).into())
    }
}

impl From<Ipv6Addr> for Uint128 {
    fn from(addr: Ipv6Addr) -> Self {
        Uint128::from(u128::from(addr))
    }
}

impl From<IpAddr> for Uint128 {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(a) => a.into(),
            IpAddr::V6(a) => a.into(),
        }
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u128::from(*self))
    }
}

impl fmt::LowerHex for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&u128::from(*self), f)
    }
}

impl Not for Uint128 {
    type Output = Uint128;

    fn not(self) -> Self::Output {
        Uint128::new(
            self.top_half ^ 0xFFFF_FFFF_FFFF_FFFFu64,
            self.bottom_half ^ 0xFFFF_FFFF_FFFF_FFFFu64,
        )
    }
}

impl BitAnd for Uint128 {
    type Output = Uint128;

    fn bitand(self, rhs: Self) -> Self::Output {
        Uint128::new(
            self.top_half & rhs.top_half,
            self.bottom_half & rhs.bottom_half,
        )
    }
}

impl BitOr for Uint128 {
    type Output = Uint128;

    fn bitor(self, rhs: Self) -> Self::Output {
        Uint128::new(
            self.top_half | rhs.top_half,
            self.bottom_half | rhs.bottom_half,
        )
    }
}
