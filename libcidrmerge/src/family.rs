use std::fmt;
use std::net::IpAddr;

use crate::error::{Error, Result};


/// The address family of an IP address, which determines its width in bits.
///
/// The declaration order is significant: IPv4 sorts before IPv6.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Family {
    Ipv4,
    Ipv6,
}

impl Family {
    /// Returns the family corresponding to the given width in bits.
    pub fn from_width(width: usize) -> Result<Family> {
        match width {
            32 => Ok(Family::Ipv4),
            128 => Ok(Family::Ipv6),
            other => Err(Error::InvalidFamilyWidth(other)),
        }
    }

    /// Returns the family of the given address.
    pub fn of(addr: &IpAddr) -> Family {
        match addr {
            IpAddr::V4(_) => Family::Ipv4,
            IpAddr::V6(_) => Family::Ipv6,
        }
    }

    /// Returns the number of bits in an address of this family.
    pub fn width(&self) -> usize {
        match self {
            Family::Ipv4 => 32,
            Family::Ipv6 => 128,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Family::Ipv4 => 4,
            Family::Ipv6 => 6,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPv{}", self.version())
    }
}
