use std::time::Instant;

use crate::diagnostics::{Diagnostic, PhaseTiming, Stage, StageReport};
use crate::error::{LogicError, Result};
use crate::kernel::GeometryKernel;
use crate::math::Point3;
use crate::network::{PlankAddress, PlankNetwork};
use crate::plank::Plank;

/// Horizontal slot pitch as a multiple of the plank width.
const SLOT_PITCH: f64 = 1.25;

/// A straight cut across an unrolled plank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutLine {
    pub start: Point3,
    pub end: Point3,
}

/// Flat-pattern data of one plank.
///
/// The unrolled plank lies in the XY plane, starting at `y = 0` and running
/// up along `+y`; `slot` is the x coordinate of its left edge.
#[derive(Debug, Clone)]
pub struct FabricationLayout<C> {
    pub slot: f64,
    /// Boundary of the unrolled plank.
    pub outline: C,
    /// Boundary of the plank's mid-surface before splitting; shares its
    /// parameterization with `outline`.
    pub original_outline: C,
    /// Cuts between neighbouring segments.
    pub cut_lines: Vec<CutLine>,
    /// Fastener locations on the 3D center curve.
    pub bolt_points: Vec<Point3>,
    /// `bolt_points` on the unrolled center line.
    pub bolt_markings: Vec<Point3>,
    /// Midpoint of each kept segment on the unrolled center line.
    pub tag_positions: Vec<Point3>,
}

/// Carries a normalized parameter of a 3D curve over to its unrolled
/// counterpart.
///
/// Outlines are built as four edges in the same order with the same share
/// of the domain each, and center lines run start to end, so equal
/// parameters denote corresponding points.
#[must_use]
pub fn transplant<K: GeometryKernel>(kernel: &K, unrolled: &K::Curve, parameter: f64) -> Point3 {
    kernel.point_at(unrolled, parameter)
}

/// Unrolls intersected planks into flat fabrication layouts.
///
/// Planks are laid side by side in address order. Cut positions are moved
/// from the 3D outline to the flat one by parameter, not by projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FabricationProjector;

impl FabricationProjector {
    /// Creates a new `FabricationProjector` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the projection over a whole network.
    ///
    /// Planks whose layout cannot be built are left out and reported as
    /// diagnostics.
    pub fn execute<K: GeometryKernel>(
        &self,
        kernel: &K,
        planks: &PlankNetwork<Plank<K>>,
    ) -> StageReport<PlankNetwork<FabricationLayout<K::Curve>>> {
        let started = Instant::now();
        let mut report = StageReport::new(PlankNetwork::new());
        for (ordinal, (address, plank)) in planks.iter().enumerate() {
            match project(kernel, ordinal, address, plank, planks) {
                Ok(layout) => {
                    tracing::debug!(
                        %address,
                        cuts = layout.cut_lines.len(),
                        bolts = layout.bolt_points.len(),
                        "plank unrolled"
                    );
                    report.output.insert(*address, layout);
                }
                Err(err) => report
                    .diagnostics
                    .push(Diagnostic::dropped(Stage::Fabricate, Some(*address), &err)),
            }
        }
        let elapsed = started.elapsed();
        tracing::info!(layouts = report.output.len(), ?elapsed, "network unrolled");
        report.timings.push(PhaseTiming {
            stage: Stage::Fabricate,
            elapsed,
        });
        report
    }
}

fn project<K: GeometryKernel>(
    kernel: &K,
    ordinal: usize,
    address: &PlankAddress,
    plank: &Plank<K>,
    network: &PlankNetwork<Plank<K>>,
) -> Result<FabricationLayout<K::Curve>> {
    let width = plank.width();
    let length = plank.length();
    #[allow(clippy::cast_precision_loss)]
    let slot = width * SLOT_PITCH * ordinal as f64;
    let middle = slot + width / 2.0;

    let left = kernel.line(Point3::new(slot, 0.0, 0.0), Point3::new(slot, length, 0.0))?;
    let right = kernel.line(
        Point3::new(slot + width, 0.0, 0.0),
        Point3::new(slot + width, length, 0.0),
    )?;
    let outline = kernel.outline(&kernel.ruled(&left, &right)?)?;
    let original_outline = kernel.outline(plank.original_surface())?;
    let center_line = kernel.line(Point3::new(middle, 0.0, 0.0), Point3::new(middle, length, 0.0))?;

    let cut_lines = cut_lines(kernel, plank, &original_outline, &outline)?;
    let (bolt_points, bolt_parameters) = bolts(kernel, address, plank, network);
    let bolt_markings = bolt_parameters
        .iter()
        .map(|&t| transplant(kernel, &center_line, t))
        .collect();

    let mut tag_positions = Vec::new();
    let mut run = 0.0;
    for (segment, &cull) in plank.segments().iter().zip(plank.cull_values()) {
        let segment_length = kernel.length(segment);
        if cull == 0 {
            tag_positions.push(Point3::new(middle, run + segment_length / 2.0, 0.0));
        }
        run += segment_length;
    }

    Ok(FabricationLayout {
        slot,
        outline,
        original_outline,
        cut_lines,
        bolt_points,
        bolt_markings,
        tag_positions,
    })
}

/// Transplants every interior edge of the split mid-surface onto the
/// unrolled outline.
fn cut_lines<K: GeometryKernel>(
    kernel: &K,
    plank: &Plank<K>,
    original_outline: &K::Curve,
    outline: &K::Curve,
) -> Result<Vec<CutLine>> {
    kernel
        .interior_edges(plank.surface())?
        .iter()
        .enumerate()
        .map(|(i, edge)| {
            let hits = kernel.intersect_curves(original_outline, edge, kernel.tolerance());
            let [a, b, ..] = hits.as_slice() else {
                return Err(LogicError::CutHitCount {
                    edge: i,
                    found: hits.len(),
                }
                .into());
            };
            Ok(CutLine {
                start: transplant(kernel, outline, a.parameter_a),
                end: transplant(kernel, outline, b.parameter_a),
            })
        })
        .collect()
}

/// Fastener points where kept segments meet co-stacked planks of other
/// directions, with their parameters on the original center curve.
fn bolts<K: GeometryKernel>(
    kernel: &K,
    address: &PlankAddress,
    plank: &Plank<K>,
    network: &PlankNetwork<Plank<K>>,
) -> (Vec<Point3>, Vec<f64>) {
    let reach = plank.thickness();
    let mut points: Vec<Point3> = Vec::new();
    let mut parameters = Vec::new();
    let partners: Vec<K::Curve> = network
        .iter()
        .filter(|(other, _)| other.direction != address.direction && address.is_co_stacked(other))
        .flat_map(|(_, other)| kernel.join_curves(other.segments()))
        .collect();

    for (_, segment, _) in plank.surviving_segments() {
        for partner in &partners {
            if kernel.intersect_curves(segment, partner, reach).is_empty() {
                continue;
            }
            for hit in kernel.intersect_curves(plank.center(), partner, reach) {
                if points
                    .iter()
                    .any(|p| (p - hit.point_a).norm() <= kernel.tolerance())
                {
                    continue;
                }
                points.push(hit.point_a);
                parameters.push(hit.parameter_a);
            }
        }
    }
    (points, parameters)
}
