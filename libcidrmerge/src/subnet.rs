use std::fmt;
use std::net::IpAddr;

use crate::block_size::BlockSize;
use crate::error::{Error, Result};
use crate::family::Family;
use crate::masks::{Mask, MaskTable};
use crate::uint128::Uint128;


/// A CIDR block, consisting of a network address and a CIDR prefix.
///
/// The base address is always the network address of the block, i.e. all host bits are zero.
/// Subnets are ordered by address family first (IPv4 before IPv6), then by base address, then by
/// CIDR prefix (larger blocks first).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Subnet {
    family: Family,
    base_addr: Uint128,
    cidr_prefix: usize,
}

impl Subnet {
    /// Constructs the subnet with the given CIDR prefix that contains `addr`. Host bits in `addr`
    /// are cleared.
    pub fn new_with_prefix(
        addr: Uint128,
        cidr_prefix: usize,
        family: Family,
        masks: &MaskTable,
    ) -> Result<Subnet> {
        if !addr.fits(family) {
            return Err(Error::AddressOutOfFamily(addr.into(), family.width()));
        }
        let mask = masks.try_get(cidr_prefix, family)?;

        // calculate base address by ANDing address with subnet mask
        Ok(Subnet {
            family,
            base_addr: addr & mask.address(),
            cidr_prefix,
        })
    }

    /// Constructs the subnet with the given CIDR prefix that contains `addr`.
    pub fn from_ip(addr: IpAddr, cidr_prefix: usize, masks: &MaskTable) -> Result<Subnet> {
        Subnet::new_with_prefix(addr.into(), cidr_prefix, Family::of(&addr), masks)
    }

    /// Constructs the subnet that contains exactly one address.
    pub fn single(addr: IpAddr) -> Subnet {
        let family = Family::of(&addr);
        Subnet {
            family,
            base_addr: addr.into(),
            cidr_prefix: family.width(),
        }
    }

    /// Constructs a subnet from a base address that is already aligned to the prefix.
    pub(crate) fn from_network(base_addr: Uint128, cidr_prefix: usize, family: Family) -> Subnet {
        debug_assert!(base_addr.fits(family));
        debug_assert!(cidr_prefix <= family.width());
        Subnet {
            family,
            base_addr,
            cidr_prefix,
        }
    }

    pub fn family(&self) -> Family { self.family }
    pub fn base_addr(&self) -> Uint128 { self.base_addr }
    pub fn cidr_prefix(&self) -> usize { self.cidr_prefix }

    /// Returns the base address of this subnet as an IP address.
    pub fn network_addr(&self) -> IpAddr {
        self.base_addr.to_ip(self.family)
    }

    pub fn mask<'m>(&self, masks: &'m MaskTable) -> &'m Mask {
        masks.get(self.cidr_prefix, self.family)
    }

    /// Returns the subnet mask of this subnet as an IP address (e.g. `255.255.255.0` for a /24).
    pub fn subnet_mask(&self, masks: &MaskTable) -> IpAddr {
        self.mask(masks).address().to_ip(self.family)
    }

    /// Returns the last address within this subnet.
    pub fn last_addr(&self, masks: &MaskTable) -> Uint128 {
        let all_ones = masks.get(self.family.width(), self.family).address();
        let host_bits = !self.mask(masks).address() & all_ones;
        self.base_addr | host_bits
    }

    /// Returns the number of addresses within this subnet.
    pub fn address_count(&self, masks: &MaskTable) -> BlockSize {
        self.mask(masks).size().clone()
    }

    pub fn contains(&self, addr: &IpAddr, masks: &MaskTable) -> bool {
        Family::of(addr) == self.family
            && (Uint128::from(*addr) & self.mask(masks).address()) == self.base_addr
    }

    /// Returns whether the base address of `other`, reduced to the CIDR prefix of this subnet,
    /// equals the base address of this subnet.
    ///
    /// This does not compare the CIDR prefixes; in canonical order, a subnet is never followed by a
    /// larger subnet with the same base address, so the check suffices to detect that `other` lies
    /// within this subnet. Use [`Subnet::is_superset_of`] for an order-independent check.
    pub fn includes(&self, other: &Subnet, masks: &MaskTable) -> bool {
        self.family == other.family
            && (other.base_addr & self.mask(masks).address()) == self.base_addr
    }

    pub fn is_superset_of(&self, other: &Subnet, masks: &MaskTable) -> bool {
        self.cidr_prefix <= other.cidr_prefix && self.includes(other, masks)
    }

    pub fn is_subset_of(&self, other: &Subnet, masks: &MaskTable) -> bool {
        other.is_superset_of(self, masks)
    }

    /// Returns the subnet whose CIDR prefix is one shorter than this one's, if this subnet is the
    /// lower half of it.
    ///
    /// A subnet with a CIDR prefix of 0 already covers the whole address family and is returned
    /// unchanged. Returns `None` if this subnet is the upper half of the wider subnet.
    pub fn widen(&self, masks: &MaskTable) -> Option<Subnet> {
        if self.cidr_prefix == 0 {
            return Some(*self);
        }

        let wider_prefix = self.cidr_prefix - 1;
        let wider_mask = masks.get(wider_prefix, self.family).address();
        if self.base_addr & wider_mask != self.base_addr {
            // upper half
            return None;
        }

        Some(Subnet::from_network(self.base_addr, wider_prefix, self.family))
    }

    /// Formats this subnet as `network/netmask`.
    pub fn to_netmask_string(&self, masks: &MaskTable) -> String {
        format!("{}/{}", self.network_addr(), self.subnet_mask(masks))
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_addr(), self.cidr_prefix)
    }
}
