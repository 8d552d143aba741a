use std::fmt;

use crate::error::Result;
use crate::kernel::GeometryKernel;
use crate::network::PlankAddress;
use crate::plank::Plank;

/// A plank's cutting solid, inflated by the cut gap.
///
/// The plank's rulings are extended by the gap at both ends and re-lofted;
/// the loft is then thickened to the plank width plus the gap.
pub struct ScaledCutter<K: GeometryKernel> {
    address: PlankAddress,
    solid: K::Solid,
}

impl<K: GeometryKernel> ScaledCutter<K> {
    /// Builds the cutter for the plank at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`](crate::error::ConstructionError) if a
    /// ruling, the loft or the thickening is degenerate.
    pub fn build(kernel: &K, address: PlankAddress, plank: &Plank<K>, gap: f64) -> Result<Self> {
        let surface = plank.original_surface();
        let refinement = plank.refinement().max(1);
        #[allow(clippy::cast_precision_loss)]
        let n = refinement as f64;
        let rulings = (0..=refinement)
            .map(|k| {
                #[allow(clippy::cast_precision_loss)]
                let u = k as f64 / n;
                let ruling = kernel.line(
                    kernel.evaluate_surface(surface, u, 0.0),
                    kernel.evaluate_surface(surface, u, 1.0),
                )?;
                kernel.extend(&ruling, gap)
            })
            .collect::<Result<Vec<_>>>()?;
        let scaled = kernel.loft(&rulings)?;
        let solid = kernel.normalize_orientation(&kernel.thicken(&scaled, plank.width() + gap)?);
        Ok(Self { address, solid })
    }

    #[must_use]
    pub fn address(&self) -> PlankAddress {
        self.address
    }

    /// Returns the outward-oriented cutting solid.
    #[must_use]
    pub fn solid(&self) -> &K::Solid {
        &self.solid
    }
}

impl<K: GeometryKernel> fmt::Debug for ScaledCutter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaledCutter")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
