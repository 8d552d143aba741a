use std::time::Instant;

use crate::diagnostics::{Diagnostic, PhaseTiming, Stage, StageReport};
use crate::error::{Result, ValidationError};
use crate::kernel::GeometryKernel;
use crate::math::Point3;
use crate::network::{AxisAddress, PlankAddress, PlankNetwork};
use crate::params::NetworkParams;
use crate::plank::{Plank, PlankParts};

use super::sweep::Ribbon;

/// Replicates one ribbon into a stack of solid planks.
///
/// For layer `l` and bundle position `m` the ribbon is offset along its
/// normal by `thickness * (m + l * planks_per_bundle)`, so bundles stack
/// face to face. Each plank gets its own center curve, re-fitted through
/// the middle of the offset surface.
pub struct PlankStack<'a> {
    params: &'a NetworkParams,
}

impl<'a> PlankStack<'a> {
    /// Creates a new `PlankStack` operation.
    #[must_use]
    pub fn new(params: &'a NetworkParams) -> Self {
        Self { params }
    }

    /// Executes the stacking for the ribbon of `axis`.
    ///
    /// A plank whose offset or thickening fails is left out and reported as
    /// a diagnostic; the others are still produced.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the parameters are out of range or
    /// `planks_per_bundle` is zero.
    pub fn execute<K: GeometryKernel>(
        &self,
        kernel: &K,
        ribbon: &Ribbon<K::Brep>,
        axis: AxisAddress,
        planks_per_bundle: u32,
    ) -> Result<StageReport<PlankNetwork<Plank<K>>>> {
        self.params.validate()?;
        if planks_per_bundle == 0 {
            return Err(ValidationError::TooFew {
                parameter: "planks per bundle",
                value: 0,
                min: 1,
            }
            .into());
        }

        let started = Instant::now();
        let mut report = StageReport::new(PlankNetwork::new());
        for layer in 0..self.params.layers {
            for position in 0..planks_per_bundle {
                let address = axis.plank(layer, position);
                let offset = self.params.thickness
                    * (f64::from(position) + f64::from(layer) * f64::from(planks_per_bundle));
                match self.stack_one(kernel, ribbon, offset, position) {
                    Ok(plank) => {
                        tracing::debug!(%address, offset, length = plank.length(), "plank stacked");
                        report.output.insert(address, plank);
                    }
                    Err(err) => report
                        .diagnostics
                        .push(Diagnostic::dropped(Stage::Stack, Some(address), &err)),
                }
            }
        }
        report.timings.push(PhaseTiming {
            stage: Stage::Stack,
            elapsed: started.elapsed(),
        });
        Ok(report)
    }

    fn stack_one<K: GeometryKernel>(
        &self,
        kernel: &K,
        ribbon: &Ribbon<K::Brep>,
        offset: f64,
        position: u32,
    ) -> Result<Plank<K>> {
        let surface = kernel.offset_surface(&ribbon.surface, offset)?;
        let solid = kernel.thicken(&surface, self.params.thickness)?;

        let refinement = self.params.refinement;
        #[allow(clippy::cast_precision_loss)]
        let n = refinement as f64;
        let samples: Vec<Point3> = (0..=refinement)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let u = i as f64 / n;
                kernel.evaluate_surface(&surface, u, 0.5)
            })
            .collect();
        let center = kernel.interpolate(&samples)?;
        let length = kernel.length(&center);

        Plank::new(PlankParts {
            segments: vec![center.clone()],
            center,
            original_surface: surface.clone(),
            surface,
            solids: vec![solid],
            cull_values: vec![0],
            thickness: self.params.thickness,
            width: self.params.width,
            length,
            refinement,
            position,
        })
    }
}

/// Address set a stack of `layers` by `planks_per_bundle` produces for `axis`.
#[must_use]
pub fn stack_addresses(axis: AxisAddress, layers: u32, planks_per_bundle: u32) -> Vec<PlankAddress> {
    (0..layers)
        .flat_map(|l| (0..planks_per_bundle).map(move |m| axis.plank(l, m)))
        .collect()
}
