use std::cmp::Ordering;
use std::net::IpAddr;

use log::trace;

use crate::block_size::BlockSize;
use crate::error::{Error, Result};
use crate::family::Family;
use crate::masks::MaskTable;
use crate::subnet::Subnet;
use crate::uint128::{Uint128, UINT128_MAX};


/// Converts a range of IP addresses (whose inclusive ends are passed as `begin` and `end`) into the
/// equivalent set of IP networks.
///
/// The networks are returned in ascending order; they are contiguous and do not overlap. Each
/// network is the largest aligned block that starts at its base address and does not extend beyond
/// `end`, which makes the result the shortest possible list of networks covering the range.
pub fn range_to_subnets(begin: Uint128, end: Uint128, family: Family, masks: &MaskTable) -> Result<Vec<Subnet>> {
    for addr in [begin, end] {
        if !addr.fits(family) {
            return Err(Error::AddressOutOfFamily(addr.into(), family.width()));
        }
    }

    let mut remaining = BlockSize::span(begin, end, family)
        .ok_or_else(|| Error::InvertedRange(begin.to_ip(family), end.to_ip(family)))?;

    let width = family.width();
    if begin == end {
        return Ok(vec![Subnet::from_network(begin, width, family)]);
    }

    let mut ret = Vec::new();

    // start with the full mask
    let mut current = begin;
    let mut mask = UINT128_MAX;
    while current <= end {
        // try enlarging the block
        let bigger_mask = mask.left_shift();
        let block_mask = if current & bigger_mask != current {
            // not aligned to the larger block
            mask
        } else {
            match current.range_end(bigger_mask).cmp(&end) {
                Ordering::Less => {
                    // anchor the growth and continue
                    mask = bigger_mask;
                    continue;
                },
                Ordering::Greater => mask,
                Ordering::Equal => {
                    take_block(&mut ret, &mut remaining, current, bigger_mask, family, masks);
                    break;
                },
            }
        };

        // we've gone beyond; store what we have and continue with the next chunk
        take_block(&mut ret, &mut remaining, current, block_mask, family, masks);
        current = match current.jump(block_mask) {
            Some(next) => next,
            None => break,
        };
        mask = UINT128_MAX;
    }

    debug_assert!(remaining.is_zero(), "{} addresses of the range not covered", remaining);
    Ok(ret)
}

fn take_block(
    blocks: &mut Vec<Subnet>,
    remaining: &mut BlockSize,
    base_addr: Uint128,
    mask: Uint128,
    family: Family,
    masks: &MaskTable,
) {
    let block = Subnet::from_network(base_addr, mask.mask_prefix_len(family.width()), family);
    *remaining = remaining.checked_sub(block.mask(masks).size())
        .expect("block does not extend beyond the range");
    trace!("range block {} ({} addresses left)", block, remaining);
    blocks.push(block);
}

/// Converts a range of IP addresses of the same family into the equivalent set of IP networks.
///
/// See [`range_to_subnets`].
pub fn ip_range_to_subnets(begin: IpAddr, end: IpAddr, masks: &MaskTable) -> Result<Vec<Subnet>> {
    let family = Family::of(&begin);
    if Family::of(&end) != family {
        return Err(Error::MixedFamilies(begin, end));
    }
    range_to_subnets(begin.into(), end.into(), family, masks)
}

#[cfg(test)]
mod properties;
