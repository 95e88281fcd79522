use std::collections::BTreeSet;

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use super::*;
use crate::uint128::Uint128;


const IPV4_WINDOW: u128 = 0x0A00_0000;
// straddles the boundary between the halves
const IPV6_WINDOW: u128 = 0x2001_0DB8_0000_0000_FFFF_FFFF_FFFF_FF80;

impl Arbitrary for Subnet {
    fn arbitrary(g: &mut Gen) -> Self {
        let masks = MaskTable::shared();
        let offset = u128::from(u8::arbitrary(g));
        let host_bits = usize::from(u8::arbitrary(g) % 9);

        let (window, family) = if u8::arbitrary(g) % 4 == 0 {
            (IPV6_WINDOW, Family::Ipv6)
        } else {
            (IPV4_WINDOW, Family::Ipv4)
        };
        Subnet::new_with_prefix(Uint128::from(window + offset), family.width() - host_bits, family, masks)
            .unwrap()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let masks = MaskTable::shared();
        let narrower = if self.cidr_prefix() < self.family().width() {
            Subnet::new_with_prefix(self.base_addr(), self.cidr_prefix() + 1, self.family(), masks).ok()
        } else {
            None
        };
        Box::new(narrower.into_iter())
    }
}

fn covered_addresses(subnets: &[Subnet]) -> BTreeSet<(Family, u128)> {
    let masks = MaskTable::shared();
    let mut ret = BTreeSet::new();
    for net in subnets {
        let first = u128::from(net.base_addr());
        let last = u128::from(net.last_addr(masks));
        for addr in first..=last {
            ret.insert((net.family(), addr));
        }
    }
    ret
}

#[quickcheck]
fn merge_is_idempotent(subnets: Vec<Subnet>) -> bool {
    let masks = MaskTable::shared();
    let once = merge_all(subnets, masks);
    merge_all(once.clone(), masks) == once
}

#[quickcheck]
fn merge_ignores_input_order(subnets: Vec<Subnet>, sort_keys: Vec<u32>) -> bool {
    let masks = MaskTable::shared();

    // permute by sorting on arbitrary keys; missing keys sort by position
    let mut keyed: Vec<(u32, usize, Subnet)> = subnets.iter()
        .enumerate()
        .map(|(i, net)| (sort_keys.get(i).copied().unwrap_or(i as u32), i, *net))
        .collect();
    keyed.sort_unstable_by_key(|&(key, i, _)| (key, i));
    let shuffled: Vec<Subnet> = keyed.into_iter().map(|(_, _, net)| net).collect();

    merge_all(subnets, masks) == merge_all(shuffled, masks)
}

#[quickcheck]
fn merge_preserves_coverage(subnets: Vec<Subnet>) -> bool {
    let before = covered_addresses(&subnets);
    let merged = merge_all(subnets, MaskTable::shared());
    covered_addresses(&merged) == before
}

#[quickcheck]
fn merge_output_is_sorted_disjoint_and_minimal(subnets: Vec<Subnet>) -> bool {
    let masks = MaskTable::shared();
    let merged = merge_all(subnets, masks);
    merged.windows(2).all(|pair| {
        let (a, b) = (pair[0], pair[1]);
        let ordered = a < b;
        let disjoint = a.family() != b.family() || a.last_addr(masks) < b.base_addr();
        let siblings = a.cidr_prefix() == b.cidr_prefix()
            && a.widen(masks).map_or(false, |wider| wider.includes(&b, masks));
        ordered && disjoint && !siblings
    })
}

#[quickcheck]
fn covered_address_count_matches_coverage(subnets: Vec<Subnet>) -> bool {
    let masks = MaskTable::shared();
    let merged = merge_all(subnets, masks);
    let covered = covered_addresses(&merged);
    let ipv4_count = covered.iter().filter(|(family, _)| *family == Family::Ipv4).count();
    let ipv6_count = covered.len() - ipv4_count;

    covered_address_count(&merged, Family::Ipv4, masks) == Some(BlockSize::Small(ipv4_count as u64))
        && covered_address_count(&merged, Family::Ipv6, masks).map(|c| c.to_biguint())
            == Some(ipv6_count.into())
}
