use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of one input center curve: `(direction, axis)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AxisAddress {
    /// Curve family.
    pub direction: u32,
    /// Center curve within the family.
    pub axis: u32,
}

impl AxisAddress {
    /// Creates an axis address.
    #[must_use]
    pub fn new(direction: u32, axis: u32) -> Self {
        Self { direction, axis }
    }

    /// Extends the address down to one stacked plank.
    #[must_use]
    pub fn plank(self, layer: u32, position: u32) -> PlankAddress {
        PlankAddress::new(self.direction, self.axis, layer, Some(position))
    }
}

impl fmt::Display for AxisAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{};{}}}", self.direction, self.axis)
    }
}

/// Address of one plank: `(direction, axis, layer[, position])`.
///
/// Ordered lexicographically by its fields, so a [`PlankNetwork`] iterates
/// direction by direction, axis by axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlankAddress {
    /// Curve family; planks never cut planks of their own direction.
    pub direction: u32,
    /// Center curve within the family.
    pub axis: u32,
    /// Stacking layer.
    pub layer: u32,
    /// Position within the bundle, if the plank is part of one.
    pub position: Option<u32>,
}

impl PlankAddress {
    /// Creates a plank address.
    #[must_use]
    pub fn new(direction: u32, axis: u32, layer: u32, position: Option<u32>) -> Self {
        Self {
            direction,
            axis,
            layer,
            position,
        }
    }

    /// Returns `true` if `other` sits at the same layer and bundle position.
    #[must_use]
    pub fn is_co_stacked(&self, other: &Self) -> bool {
        self.layer == other.layer && self.position == other.position
    }
}

impl fmt::Display for PlankAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(
                f,
                "{{{};{};{};{}}}",
                self.direction, self.axis, self.layer, position
            ),
            None => write!(f, "{{{};{};{}}}", self.direction, self.axis, self.layer),
        }
    }
}

/// Address-keyed collection exchanged between pipeline stages.
pub type PlankNetwork<T> = BTreeMap<PlankAddress, T>;

/// Address-keyed collection of input center curves.
pub type AxisNetwork<T> = BTreeMap<AxisAddress, T>;

/// Number of axes sharing each direction.
///
/// This is the bundle size used when stacking planks.
#[must_use]
pub fn axes_per_direction<T>(axes: &AxisNetwork<T>) -> BTreeMap<u32, u32> {
    let mut counts = BTreeMap::new();
    for address in axes.keys() {
        *counts.entry(address.direction).or_insert(0) += 1;
    }
    counts
}

/// Compares the key sets of two networks.
///
/// Returns `(missing, unexpected)`: addresses of `targets` absent from
/// `cutters`, and addresses of `cutters` absent from `targets`.
#[must_use]
pub fn key_difference<A, B>(
    targets: &PlankNetwork<A>,
    cutters: &PlankNetwork<B>,
) -> (Vec<PlankAddress>, Vec<PlankAddress>) {
    let missing = targets
        .keys()
        .filter(|k| !cutters.contains_key(k))
        .copied()
        .collect();
    let unexpected = cutters
        .keys()
        .filter(|k| !targets.contains_key(k))
        .copied()
        .collect();
    (missing, unexpected)
}
