use log::debug;
use once_cell::sync::Lazy;

use crate::block_size::BlockSize;
use crate::error::{Error, Result};
use crate::family::Family;
use crate::uint128::Uint128;


/// Subnet mask byte for a byte containing the given number of network bits.
const PREFIX_TO_MASK_BYTE: [u8; 9] = [0x00, 0x80, 0xC0, 0xE0, 0xF0, 0xF8, 0xFC, 0xFE, 0xFF];

static SHARED_MASKS: Lazy<MaskTable> = Lazy::new(|| {
    debug!("building shared mask table");
    MaskTable::new()
});


/// The subnet mask belonging to a CIDR prefix, along with the number of addresses it covers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mask {
    address: Uint128,
    size: BlockSize,
}

impl Mask {
    /// The mask itself: `prefix` one-bits followed by zero-bits, aligned to the width of the
    /// address family.
    pub fn address(&self) -> Uint128 { self.address }

    /// The number of addresses covered by the prefix, i.e. 2^(width - prefix).
    pub fn size(&self) -> &BlockSize { &self.size }
}


/// A lookup table of the masks for every CIDR prefix of both address families.
///
/// The table is immutable once built. [`MaskTable::shared`] provides a lazily built instance that
/// may be read from any number of threads.
#[derive(Clone, Debug)]
pub struct MaskTable {
    ipv4: Vec<Mask>,
    ipv6: Vec<Mask>,
}

impl MaskTable {
    pub fn new() -> MaskTable {
        MaskTable {
            ipv4: build_masks(Family::Ipv4),
            ipv6: build_masks(Family::Ipv6),
        }
    }

    /// Returns the process-wide mask table, building it on first use.
    pub fn shared() -> &'static MaskTable {
        &SHARED_MASKS
    }

    fn masks_for(&self, family: Family) -> &[Mask] {
        match family {
            Family::Ipv4 => &self.ipv4,
            Family::Ipv6 => &self.ipv6,
        }
    }

    /// Returns the mask for the given CIDR prefix.
    ///
    /// # Panics
    ///
    /// Panics if the prefix is greater than the width of the address family.
    pub fn get(&self, cidr_prefix: usize, family: Family) -> &Mask {
        match self.masks_for(family).get(cidr_prefix) {
            Some(mask) => mask,
            None => panic!("CIDR prefix {} is out of range for {}", cidr_prefix, family),
        }
    }

    /// Returns the mask for the given CIDR prefix, or an error if the prefix is greater than the
    /// width of the address family.
    pub fn try_get(&self, cidr_prefix: usize, family: Family) -> Result<&Mask> {
        self.masks_for(family)
            .get(cidr_prefix)
            .ok_or(Error::PrefixOutOfRange(cidr_prefix, family.width()))
    }

    /// Returns the CIDR prefix corresponding to the given subnet mask, or `None` if the mask is not
    /// a contiguous run of one-bits followed by zero-bits.
    pub fn prefix_of(&self, mask: Uint128, family: Family) -> Option<usize> {
        if !mask.fits(family) {
            return None;
        }
        let cidr_prefix = mask.mask_prefix_len(family.width());
        if self.get(cidr_prefix, family).address == mask {
            Some(cidr_prefix)
        } else {
            None
        }
    }
}

impl Default for MaskTable {
    fn default() -> Self {
        MaskTable::new()
    }
}

fn mask_bytes_from_prefix(cidr_prefix: usize, byte_count: usize) -> Vec<u8> {
    (0..byte_count)
        .map(|i| PREFIX_TO_MASK_BYTE[cidr_prefix.saturating_sub(i * 8).min(8)])
        .collect()
}

fn build_masks(family: Family) -> Vec<Mask> {
    let width = family.width();
    (0..=width)
        .map(|cidr_prefix| {
            let mask_bytes = mask_bytes_from_prefix(cidr_prefix, width / 8);
            Mask {
                address: Uint128::from_bytes(&mask_bytes).expect("mask has the width of an address"),
                size: BlockSize::zero(family).with_bit(width - cidr_prefix),
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::uint128::{UINT128_MAX, UINT128_ZERO};

    #[test]
    fn test_mask_bytes_from_prefix() {
        assert_eq!(vec![0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000], mask_bytes_from_prefix(0, 4));
        assert_eq!(vec![0b1000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000], mask_bytes_from_prefix(1, 4));
        assert_eq!(vec![0b1111_1110, 0b0000_0000, 0b0000_0000, 0b0000_0000], mask_bytes_from_prefix(7, 4));
        assert_eq!(vec![0b1111_1111, 0b0000_0000, 0b0000_0000, 0b0000_0000], mask_bytes_from_prefix(8, 4));
        assert_eq!(vec![0b1111_1111, 0b1111_1000, 0b0000_0000, 0b0000_0000], mask_bytes_from_prefix(13, 4));
        assert_eq!(vec![0b1111_1111, 0b1111_1111, 0b1111_1111, 0b0000_0000], mask_bytes_from_prefix(24, 4));
        assert_eq!(vec![0b1111_1111, 0b1111_1111, 0b1111_1111, 0b1111_1100], mask_bytes_from_prefix(30, 4));
        assert_eq!(vec![0b1111_1111, 0b1111_1111, 0b1111_1111, 0b1111_1111], mask_bytes_from_prefix(32, 4));

        let mut v6_64 = vec![0xFF; 8];
        v6_64.extend_from_slice(&[0x00; 8]);
        assert_eq!(v6_64, mask_bytes_from_prefix(64, 16));
        assert_eq!(vec![0xFF; 16], mask_bytes_from_prefix(128, 16));
    }

    #[test]
    fn test_ipv4_masks() {
        let masks = MaskTable::new();
        assert_eq!(UINT128_ZERO, masks.get(0, Family::Ipv4).address());
        assert_eq!(&BlockSize::Small(0x1_0000_0000), masks.get(0, Family::Ipv4).size());

        assert_eq!(Uint128::new(0, 0xFFFFFF00), masks.get(24, Family::Ipv4).address());
        assert_eq!(&BlockSize::Small(256), masks.get(24, Family::Ipv4).size());

        assert_eq!(Uint128::new(0, 0xFFFFFFFF), masks.get(32, Family::Ipv4).address());
        assert_eq!(&BlockSize::Small(1), masks.get(32, Family::Ipv4).size());
    }

    #[test]
    fn test_ipv6_masks() {
        let masks = MaskTable::new();
        assert_eq!(UINT128_ZERO, masks.get(0, Family::Ipv6).address());
        assert_eq!(
            "340282366920938463463374607431768211456",
            masks.get(0, Family::Ipv6).size().to_string(),
        );

        assert_eq!(Uint128::new(0xFFFFFFFFFFFFFFFF, 0x0), masks.get(64, Family::Ipv6).address());
        assert_eq!("18446744073709551616", masks.get(64, Family::Ipv6).size().to_string());

        assert_eq!(Uint128::new(0xFFFFFFFFFFFFFFFF, 0x8000000000000000), masks.get(65, Family::Ipv6).address());
        assert_eq!(UINT128_MAX, masks.get(128, Family::Ipv6).address());
        assert!(masks.get(128, Family::Ipv6).size().checked_sub(&BlockSize::zero(Family::Ipv6).with_bit(0)).unwrap().is_zero());
    }

    #[test]
    fn test_every_size_is_a_power_of_two() {
        let masks = MaskTable::new();
        for family in [Family::Ipv4, Family::Ipv6] {
            for cidr_prefix in 0..=family.width() {
                let expected = BlockSize::zero(family).with_bit(family.width() - cidr_prefix);
                assert_eq!(&expected, masks.get(cidr_prefix, family).size());
                assert_eq!(cidr_prefix, masks.get(cidr_prefix, family).address().mask_prefix_len(family.width()));
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_prefix_beyond_width_panics() {
        MaskTable::new().get(33, Family::Ipv4);
    }

    #[test]
    fn test_try_get() {
        let masks = MaskTable::new();
        assert!(masks.try_get(128, Family::Ipv6).is_ok());
        assert_eq!(Err(Error::PrefixOutOfRange(33, 32)), masks.try_get(33, Family::Ipv4));
        assert_eq!(Err(Error::PrefixOutOfRange(129, 128)), masks.try_get(129, Family::Ipv6));
    }

    #[test]
    fn test_prefix_of() {
        let masks = MaskTable::shared();
        assert_eq!(Some(24), masks.prefix_of(Uint128::new(0, 0xFFFFFF00), Family::Ipv4));
        assert_eq!(Some(0), masks.prefix_of(UINT128_ZERO, Family::Ipv4));
        assert_eq!(Some(32), masks.prefix_of(Uint128::new(0, 0xFFFFFFFF), Family::Ipv4));
        assert_eq!(None, masks.prefix_of(Uint128::new(0, 0xFF00FF00), Family::Ipv4));
        assert_eq!(None, masks.prefix_of(UINT128_MAX, Family::Ipv4));
        assert_eq!(Some(128), masks.prefix_of(UINT128_MAX, Family::Ipv6));
        assert_eq!(Some(48), masks.prefix_of(Uint128::new(0xFFFFFFFFFFFF0000, 0x0), Family::Ipv6));
    }
}
