use std::time::Instant;

use crate::carrier::Carrier;
use crate::diagnostics::{Diagnostic, PhaseTiming, Stage};
use crate::error::Result;
use crate::kernel::GeometryKernel;
use crate::network::{axes_per_direction, AxisNetwork, PlankAddress, PlankNetwork};
use crate::operations::{
    FabricationLayout, FabricationProjector, FrameSweep, NetworkIntersector, PlankStack,
};
use crate::params::NetworkParams;
use crate::plank::Plank;

/// Everything a full network build produced.
pub struct NetworkReport<K: GeometryKernel> {
    /// Planks straight out of the stacking stage.
    pub stacked: PlankNetwork<Plank<K>>,
    /// Planks after cutting against each other.
    pub intersected: PlankNetwork<Plank<K>>,
    pub layouts: PlankNetwork<FabricationLayout<K::Curve>>,
    /// Every record dropped along the way, in stage order.
    pub diagnostics: Vec<Diagnostic>,
    pub timings: Vec<PhaseTiming>,
}

impl<K: GeometryKernel> NetworkReport<K> {
    /// Returns `true` if no record was dropped at any stage.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Runs sweep, stack, intersection and fabrication over a set of center
/// curves.
///
/// The bundle size of each direction is its number of axes. The stacked
/// network cuts itself.
pub struct PlankNetworkBuilder {
    params: NetworkParams,
}

impl PlankNetworkBuilder {
    /// Creates a new `PlankNetworkBuilder`.
    #[must_use]
    pub fn new(params: NetworkParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Builds the network for `curves` on `carrier`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`](crate::error::ValidationError) if the
    /// parameters are out of range. Geometry failures of single curves or
    /// planks only drop the affected records.
    pub fn build<K, S>(
        &self,
        kernel: &K,
        carrier: &S,
        curves: &AxisNetwork<K::Curve>,
    ) -> Result<NetworkReport<K>>
    where
        K: GeometryKernel,
        S: Carrier + ?Sized,
    {
        self.params.validate()?;
        let mut diagnostics = Vec::new();
        let mut timings = Vec::new();

        let started = Instant::now();
        let mut ribbons = Vec::with_capacity(curves.len());
        for (axis, curve) in curves {
            match FrameSweep::new(curve, self.params.refinement, self.params.width)
                .execute(kernel, carrier)
            {
                Ok(ribbon) => ribbons.push((*axis, ribbon)),
                Err(err) => {
                    // Sweep failures are keyed by the axis alone.
                    let address = PlankAddress::new(axis.direction, axis.axis, 0, None);
                    diagnostics.push(Diagnostic::dropped(Stage::Sweep, Some(address), &err));
                }
            }
        }
        timings.push(PhaseTiming {
            stage: Stage::Sweep,
            elapsed: started.elapsed(),
        });
        tracing::info!(
            curves = curves.len(),
            ribbons = ribbons.len(),
            elapsed = ?started.elapsed(),
            "curves swept"
        );

        let bundles = axes_per_direction(curves);
        let stack = PlankStack::new(&self.params);
        let mut stacked = PlankNetwork::new();
        for (axis, ribbon) in &ribbons {
            let planks_per_bundle = bundles.get(&axis.direction).copied().unwrap_or(1);
            let planks = stack
                .execute(kernel, ribbon, *axis, planks_per_bundle)?
                .drain_into(&mut diagnostics, &mut timings);
            stacked.extend(planks);
        }

        let intersected = NetworkIntersector::from_params(&self.params)
            .execute(kernel, &stacked, &stacked)?
            .drain_into(&mut diagnostics, &mut timings);

        let layouts = FabricationProjector::new()
            .execute(kernel, &intersected)
            .drain_into(&mut diagnostics, &mut timings);

        Ok(NetworkReport {
            stacked,
            intersected,
            layouts,
            diagnostics,
            timings,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::carrier::SurfaceCarrier;
    use crate::geometry::Plane;
    use crate::kernel::StripKernel;
    use crate::network::AxisAddress;
    use crate::test_support::{p, scenario_params};
    use approx::assert_relative_eq;
    use tracing_subscriber::EnvFilter;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn curves(
        kernel: &StripKernel,
        lines: &[(AxisAddress, crate::math::Point3, crate::math::Point3)],
    ) -> AxisNetwork<crate::geometry::Polyline> {
        lines
            .iter()
            .map(|&(axis, a, b)| (axis, kernel.line(a, b).unwrap()))
            .collect()
    }

    #[test]
    fn parallel_curves_stay_whole() {
        init_tracing();
        let kernel = StripKernel::default();
        let carrier = SurfaceCarrier::new(Plane::world_xy());
        let input = curves(
            &kernel,
            &[
                (AxisAddress::new(0, 0), p(0.0, -0.5, 0.0), p(0.0, 0.5, 0.0)),
                (AxisAddress::new(1, 0), p(1.0, -0.5, 0.0), p(1.0, 0.5, 0.0)),
            ],
        );
        let report = PlankNetworkBuilder::new(scenario_params())
            .build(&kernel, &carrier, &input)
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.intersected.len(), 2);
        assert_eq!(report.layouts.len(), 2);
        for (address, plank) in &report.intersected {
            assert_eq!(plank.cull_values(), &[0]);
            assert_eq!(plank.solids().len(), 1);
            let before = kernel
                .area_properties(report.stacked[address].surface())
                .unwrap()
                .area;
            let after = kernel.area_properties(plank.surface()).unwrap().area;
            assert_relative_eq!(before, after, epsilon = 1e-9);
        }
    }

    #[test]
    fn crossing_curves_cut_the_higher_direction() {
        init_tracing();
        let kernel = StripKernel::default();
        let carrier = SurfaceCarrier::new(Plane::world_xy());
        let input = curves(
            &kernel,
            &[
                (AxisAddress::new(0, 0), p(0.0, -0.5, 0.0), p(0.0, 0.5, 0.0)),
                (AxisAddress::new(1, 0), p(-0.5, 0.0, 0.0), p(0.5, 0.0, 0.0)),
            ],
        );
        let report = PlankNetworkBuilder::new(scenario_params())
            .build(&kernel, &carrier, &input)
            .unwrap();

        assert!(report.is_clean());
        let whole = &report.intersected[&PlankAddress::new(0, 0, 0, Some(0))];
        assert_eq!(whole.cull_values(), &[0]);
        let cut = &report.intersected[&PlankAddress::new(1, 0, 0, Some(0))];
        assert_eq!(cut.cull_values(), &[0, 1, 0]);
        assert_eq!(cut.cull_values().iter().filter(|&&c| c == 0).count(), cut.solids().len());

        let layout = &report.layouts[&PlankAddress::new(1, 0, 0, Some(0))];
        assert_eq!(layout.cut_lines.len(), 2);
        assert_eq!(layout.tag_positions.len(), 2);

        let stages: Vec<Stage> = report.timings.iter().map(|t| t.stage).collect();
        assert_eq!(
            stages,
            vec![
                Stage::Sweep,
                Stage::Stack,
                Stage::Stack,
                Stage::Cutters,
                Stage::Intersect,
                Stage::Fabricate
            ]
        );
    }

    #[test]
    fn bundle_size_follows_axis_count() {
        let kernel = StripKernel::default();
        let carrier = SurfaceCarrier::new(Plane::world_xy());
        let input = curves(
            &kernel,
            &[
                (AxisAddress::new(0, 0), p(0.0, -0.5, 0.0), p(0.0, 0.5, 0.0)),
                (AxisAddress::new(0, 1), p(1.0, -0.5, 0.0), p(1.0, 0.5, 0.0)),
            ],
        );
        let report = PlankNetworkBuilder::new(scenario_params())
            .build(&kernel, &carrier, &input)
            .unwrap();
        assert_eq!(report.stacked.len(), 4);
        let raised = &report.stacked[&PlankAddress::new(0, 1, 0, Some(1))];
        assert_relative_eq!(kernel.point_at(raised.center(), 0.5).z, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn failed_sweep_is_reported_and_skipped() {
        let kernel = StripKernel::default();
        let carrier = SurfaceCarrier::new(Plane::world_xy());
        let input = curves(
            &kernel,
            &[
                (AxisAddress::new(0, 0), p(0.0, -0.5, 0.0), p(0.0, 0.5, 0.0)),
                (AxisAddress::new(1, 0), p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0)),
            ],
        );
        let report = PlankNetworkBuilder::new(scenario_params())
            .build(&kernel, &carrier, &input)
            .unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].stage, Stage::Sweep);
        assert_eq!(report.diagnostics[0].address, Some(PlankAddress::new(1, 0, 0, None)));
        assert_eq!(report.intersected.len(), 1);
        assert_eq!(report.layouts.len(), 1);
    }

    #[test]
    fn invalid_params_abort() {
        let kernel = StripKernel::default();
        let carrier = SurfaceCarrier::new(Plane::world_xy());
        let err = PlankNetworkBuilder::new(NetworkParams::new(0.02, 0.0))
            .build(&kernel, &carrier, &AxisNetwork::new())
            .err()
            .unwrap();
        assert!(err.is_validation());
    }
}
