#![allow(clippy::unwrap_used)]

use crate::carrier::SurfaceCarrier;
use crate::geometry::Plane;
use crate::kernel::{GeometryKernel, StripKernel};
use crate::math::Point3;
use crate::network::{AxisAddress, PlankNetwork};
use crate::operations::{FrameSweep, PlankStack};
use crate::params::NetworkParams;
use crate::plank::{Plank, PlankParts};

pub(crate) fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

/// Thickness 0.02, width 0.1, one layer, refinement 4.
pub(crate) fn scenario_params() -> NetworkParams {
    NetworkParams::new(0.02, 0.1).with_refinement(4)
}

/// Sweeps straight axes on the world XY plane and stacks each into a single
/// plank.
pub(crate) fn flat_network(
    kernel: &StripKernel,
    axes: &[(AxisAddress, Point3, Point3)],
) -> PlankNetwork<Plank<StripKernel>> {
    let params = scenario_params();
    let carrier = SurfaceCarrier::new(Plane::world_xy());
    let mut network = PlankNetwork::new();
    for &(axis, start, end) in axes {
        let curve = kernel.line(start, end).unwrap();
        let ribbon = FrameSweep::new(&curve, params.refinement, params.width)
            .execute(kernel, &carrier)
            .unwrap();
        let report = PlankStack::new(&params)
            .execute(kernel, &ribbon, axis, 1)
            .unwrap();
        network.extend(report.output);
    }
    network
}

/// Field values of `plank`, for building altered copies.
pub(crate) fn parts_of(plank: &Plank<StripKernel>) -> PlankParts<StripKernel> {
    PlankParts {
        center: plank.center().clone(),
        segments: plank.segments().to_vec(),
        original_surface: plank.original_surface().clone(),
        surface: plank.surface().clone(),
        solids: plank.solids().to_vec(),
        cull_values: plank.cull_values().to_vec(),
        thickness: plank.thickness(),
        width: plank.width(),
        length: plank.length(),
        refinement: plank.refinement(),
        position: plank.position(),
    }
}

/// Two planks along `+y`, one unit apart.
pub(crate) fn parallel_pair(kernel: &StripKernel) -> PlankNetwork<Plank<StripKernel>> {
    flat_network(
        kernel,
        &[
            (AxisAddress::new(0, 0), p(0.0, -0.5, 0.0), p(0.0, 0.5, 0.0)),
            (AxisAddress::new(1, 0), p(1.0, -0.5, 0.0), p(1.0, 0.5, 0.0)),
        ],
    )
}

/// Two planks crossing at the origin: direction 0 along `+y`, direction 1
/// along `+x`.
pub(crate) fn crossing_pair(kernel: &StripKernel) -> PlankNetwork<Plank<StripKernel>> {
    flat_network(
        kernel,
        &[
            (AxisAddress::new(0, 0), p(0.0, -0.5, 0.0), p(0.0, 0.5, 0.0)),
            (AxisAddress::new(1, 0), p(-0.5, 0.0, 0.0), p(0.5, 0.0, 0.0)),
        ],
    )
}
