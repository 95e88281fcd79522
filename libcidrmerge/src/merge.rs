use log::debug;

use crate::block_size::BlockSize;
use crate::family::Family;
use crate::masks::MaskTable;
use crate::subnet::Subnet;


/// Sorts the list of networks into canonical order: by address family, then by base address, then
/// by CIDR prefix (larger networks first).
pub fn sort_subnets(subnets: &mut [Subnet]) {
    subnets.sort_unstable();
}

/// Removes every network that is contained in the network retained before it.
///
/// The list must be sorted (see [`sort_subnets`]); a network is then never preceded by a network
/// it contains.
pub fn dedup_sorted(subnets: &mut Vec<Subnet>, masks: &MaskTable) {
    if subnets.is_empty() {
        return;
    }

    let mut kept = 0;
    for i in 1..subnets.len() {
        if subnets[kept].includes(&subnets[i], masks) {
            continue;
        }
        kept += 1;
        subnets[kept] = subnets[i];
    }
    subnets.truncate(kept + 1);
}

/// Performs a single pass over a sorted and deduplicated list of networks, joining each network
/// with the following network if both are the two halves of the same larger network.
///
/// A joined network is not joined again in the same pass with a network of its new size.
pub fn merge_pairs(subnets: &mut Vec<Subnet>, masks: &MaskTable) {
    if subnets.is_empty() {
        return;
    }

    let mut kept = 0;
    for i in 1..subnets.len() {
        if let Some(wider) = subnets[kept].widen(masks) {
            if subnets[kept].cidr_prefix() == subnets[i].cidr_prefix() && wider.includes(&subnets[i], masks) {
                // i is the upper half
                subnets[kept] = wider;
                continue;
            }
        }
        kept += 1;
        subnets[kept] = subnets[i];
    }
    subnets.truncate(kept + 1);
}

/// Joins adjacent networks of a sorted and deduplicated list until no more networks can be joined.
pub fn merge_sorted(subnets: &mut Vec<Subnet>, masks: &MaskTable) {
    let mut pass = 0;
    loop {
        let before = subnets.len();
        merge_pairs(subnets, masks);
        pass += 1;
        debug!("merge pass {}: {} -> {} networks", pass, before, subnets.len());

        if subnets.len() == before {
            break;
        }
    }
}

/// Minimizes the list of networks such that duplicate entries and networks that are subnets of
/// other networks in the list are removed from the list, and adjacent networks are merged if
/// possible.
///
/// The result is sorted canonically and covers exactly the same addresses as the input. IPv4 and
/// IPv6 networks may be mixed; they are never merged with each other.
pub fn merge_all(mut subnets: Vec<Subnet>, masks: &MaskTable) -> Vec<Subnet> {
    sort_subnets(&mut subnets);
    dedup_sorted(&mut subnets, masks);
    merge_sorted(&mut subnets, masks);
    subnets
}

/// Returns the number of addresses of the given family covered by the networks.
///
/// The networks must not overlap, as is the case for the output of [`merge_all`]. Returns `None` if
/// the count does not fit into the counter for the family.
pub fn covered_address_count(subnets: &[Subnet], family: Family, masks: &MaskTable) -> Option<BlockSize> {
    subnets.iter()
        .filter(|net| net.family() == family)
        .try_fold(BlockSize::zero(family), |total, net| total.checked_add(net.mask(masks).size()))
}

#[cfg(test)]
mod properties;
