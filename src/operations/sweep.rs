use crate::carrier::Carrier;
use crate::error::{ConstructionError, Result, ValidationError};
use crate::kernel::GeometryKernel;
use crate::math::{unit, Point3, Vector3};

/// Moving frame of a center curve at one sample.
#[derive(Debug, Clone, Copy)]
pub struct FrameSample {
    /// Normalized curve parameter.
    pub t: f64,
    /// Closest carrier point to the curve point at `t`.
    pub point: Point3,
    /// Unit curve tangent.
    pub tangent: Vector3,
    /// Unit carrier normal at `point`.
    pub normal: Vector3,
    /// Unit `tangent × normal`; the ribbon's cross-sections run along it.
    pub binormal: Vector3,
}

/// A swept ribbon mid-surface and the frames it was built from.
#[derive(Debug, Clone)]
pub struct Ribbon<B> {
    pub surface: B,
    pub frames: Vec<FrameSample>,
}

/// Sweeps a ribbon of constant width along a curve lying on a carrier.
///
/// The curve is sampled at `refinement + 1` evenly spaced parameters. At
/// each sample a cross-section of length `width`, centered on the carrier
/// and running along the binormal, is placed; the sections are then lofted.
pub struct FrameSweep<'a, C> {
    curve: &'a C,
    refinement: usize,
    width: f64,
}

impl<'a, C> FrameSweep<'a, C> {
    /// Creates a new `FrameSweep` operation.
    #[must_use]
    pub fn new(curve: &'a C, refinement: usize, width: f64) -> Self {
        Self {
            curve,
            refinement,
            width,
        }
    }

    /// Executes the sweep.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for a zero refinement or non-positive
    /// width, and [`ConstructionError`] if a carrier projection fails, the
    /// tangent is parallel to the carrier normal, or the loft fails.
    pub fn execute<K, S>(&self, kernel: &K, carrier: &S) -> Result<Ribbon<K::Brep>>
    where
        K: GeometryKernel<Curve = C>,
        S: Carrier + ?Sized,
    {
        if self.refinement == 0 {
            return Err(ValidationError::TooFew {
                parameter: "refinement",
                value: 0,
                min: 1,
            }
            .into());
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ValidationError::NonPositive {
                parameter: "width",
                value: self.width,
            }
            .into());
        }

        #[allow(clippy::cast_precision_loss)]
        let n = self.refinement as f64;
        let half = self.width / 2.0;
        let mut frames = Vec::with_capacity(self.refinement + 1);
        let mut sections = Vec::with_capacity(self.refinement + 1);
        for i in 0..=self.refinement {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / n;
            let tangent = kernel.tangent_at(self.curve, t)?;
            let on_carrier = carrier.closest_point(&kernel.point_at(self.curve, t), kernel.tolerance())?;
            let binormal = unit(&tangent.cross(&on_carrier.normal)).map_err(|_| {
                ConstructionError::Degenerate(format!(
                    "curve tangent is parallel to the carrier normal at t = {t:.4}"
                ))
            })?;
            sections.push(kernel.line(
                on_carrier.point - binormal * half,
                on_carrier.point + binormal * half,
            )?);
            frames.push(FrameSample {
                t,
                point: on_carrier.point,
                tangent,
                normal: on_carrier.normal,
                binormal,
            });
        }

        let surface = kernel.loft(&sections)?;
        tracing::debug!(samples = frames.len(), width = self.width, "ribbon swept");
        Ok(Ribbon { surface, frames })
    }
}
