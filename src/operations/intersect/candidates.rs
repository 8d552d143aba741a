use crate::kernel::GeometryKernel;
use crate::network::PlankAddress;
use crate::params::TieBreak;

use super::cutter::ScaledCutter;

/// Cutters that may cut the plank at `target`.
///
/// A cutter qualifies when it belongs to another direction allowed by
/// `tie_break` and sits at the same layer and bundle position. Cutters are
/// told apart by address only, so two planks with coinciding solids both
/// count.
pub(crate) fn select_candidates<'c, K: GeometryKernel>(
    target: &PlankAddress,
    cutters: &'c [ScaledCutter<K>],
    tie_break: TieBreak,
) -> Vec<&'c ScaledCutter<K>> {
    let mut selected: Vec<&ScaledCutter<K>> = Vec::new();
    for cutter in cutters {
        let address = cutter.address();
        if address.direction == target.direction
            || !tie_break.cuts(target.direction, address.direction)
            || !target.is_co_stacked(&address)
            || selected.iter().any(|s| s.address() == address)
        {
            continue;
        }
        selected.push(cutter);
    }
    selected
}
