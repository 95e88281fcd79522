//! Merging of IP networks and decomposition of address ranges into networks.
//!
//! Lists of IPv4 and IPv6 networks are minimized with [`merge_all`]; inclusive address ranges are
//! split into the shortest equivalent list of networks with [`range_to_subnets`]. Both work on
//! 128-bit values ([`Uint128`]) with masks looked up in a [`MaskTable`].

pub mod block_size;
pub mod derange;
pub mod error;
pub mod family;
pub mod masks;
pub mod merge;
pub mod request;
pub mod subnet;
pub mod uint128;


pub use crate::block_size::BlockSize;
pub use crate::derange::{ip_range_to_subnets, range_to_subnets};
pub use crate::error::{Error, Result};
pub use crate::family::Family;
pub use crate::masks::{Mask, MaskTable};
pub use crate::merge::{covered_address_count, merge_all};
pub use crate::request::{parse_request, scan_requests, ParseRequestError, Request, ScanError, ScanOptions};
pub use crate::subnet::Subnet;
pub use crate::uint128::Uint128;
