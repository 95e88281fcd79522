use quickcheck_macros::quickcheck;

use super::*;
use crate::merge::merge_all;


/// Checks that the blocks start at `begin`, end at `end`, follow each other without gaps and are
/// aligned to their own size.
fn covers_exactly(blocks: &[Subnet], begin: Uint128, end: Uint128) -> bool {
    let masks = MaskTable::shared();
    let (first, last) = match (blocks.first(), blocks.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return false,
    };
    if first.base_addr() != begin || last.last_addr(masks) != end {
        return false;
    }

    let aligned = blocks.iter()
        .all(|block| block.base_addr() & block.mask(masks).address() == block.base_addr());
    let contiguous = blocks.windows(2)
        .all(|pair| pair[0].last_addr(masks).add(&Uint128::new(0, 1)) == Some(pair[1].base_addr()));
    aligned && contiguous
}

fn ordered(a: Uint128, b: Uint128) -> (Uint128, Uint128) {
    if a <= b { (a, b) } else { (b, a) }
}

#[quickcheck]
fn ipv4_decomposition_is_exact(one: u32, other: u32) -> bool {
    let (begin, end) = ordered(Uint128::from(u128::from(one)), Uint128::from(u128::from(other)));
    let blocks = range_to_subnets(begin, end, Family::Ipv4, MaskTable::shared()).unwrap();
    covers_exactly(&blocks, begin, end)
}

#[quickcheck]
fn ipv6_decomposition_is_exact(one: u128, other: u128) -> bool {
    let (begin, end) = ordered(Uint128::from(one), Uint128::from(other));
    let blocks = range_to_subnets(begin, end, Family::Ipv6, MaskTable::shared()).unwrap();
    covers_exactly(&blocks, begin, end)
}

#[quickcheck]
fn ipv6_decomposition_at_top_of_space_is_exact(length: u16) -> bool {
    let begin = Uint128::from(u128::MAX - u128::from(length));
    let end = Uint128::from(u128::MAX);
    let blocks = range_to_subnets(begin, end, Family::Ipv6, MaskTable::shared()).unwrap();
    covers_exactly(&blocks, begin, end)
}

#[quickcheck]
fn decomposition_cannot_be_merged_further(one: u32, other: u32, ipv6_offset: u64) -> bool {
    let masks = MaskTable::shared();
    let (begin, end) = ordered(Uint128::from(u128::from(one)), Uint128::from(u128::from(other)));
    let ipv4_blocks = range_to_subnets(begin, end, Family::Ipv4, masks).unwrap();

    let ipv6_begin = Uint128::new(ipv6_offset, begin.bottom_half());
    let ipv6_end = Uint128::new(ipv6_offset, end.bottom_half());
    let ipv6_blocks = range_to_subnets(ipv6_begin, ipv6_end, Family::Ipv6, masks).unwrap();

    merge_all(ipv4_blocks.clone(), masks) == ipv4_blocks
        && merge_all(ipv6_blocks.clone(), masks) == ipv6_blocks
}

#[quickcheck]
fn inverted_range_is_rejected(one: u32, other: u32) -> bool {
    let (begin, end) = ordered(Uint128::from(u128::from(one)), Uint128::from(u128::from(other)));
    if begin == end {
        return true;
    }
    range_to_subnets(end, begin, Family::Ipv4, MaskTable::shared()).is_err()
}
