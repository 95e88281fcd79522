use std::net::IpAddr;

use thiserror::Error;


/// The result type of the address algebra.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that occurs when the address algebra is handed values it cannot work with.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The address family width is neither 32 (IPv4) nor 128 (IPv6).
    #[error("invalid address family width {0}; expected 32 or 128")]
    InvalidFamilyWidth(usize),

    /// The CIDR prefix is greater than the width of the address family. The first value is the
    /// prefix, the second the maximum.
    #[error("CIDR prefix {0} is greater than the maximum ({1})")]
    PrefixOutOfRange(usize, usize),

    /// The value has bits set beyond the width of the address family.
    #[error("value {0:#x} does not fit into a {1}-bit address")]
    AddressOutOfFamily(u128, usize),

    /// The beginning of a range lies after its end.
    #[error("range {0}-{1} is inverted: the beginning lies after the end")]
    InvertedRange(IpAddr, IpAddr),

    /// The ends of a range belong to different address families.
    #[error("range {0}-{1} mixes IPv4 and IPv6")]
    MixedFamilies(IpAddr, IpAddr),
}
