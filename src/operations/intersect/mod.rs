mod candidates;
mod classify;
mod cutter;
mod order;

pub use cutter::ScaledCutter;
pub use order::order_along_curve;

use std::time::Instant;

use crate::diagnostics::{Diagnostic, PhaseTiming, Stage, StageReport};
use crate::error::{LogicError, Result, ValidationError};
use crate::kernel::GeometryKernel;
use crate::network::{key_difference, PlankAddress, PlankNetwork};
use crate::params::{NetworkParams, TieBreak};
use crate::plank::{Plank, PlankParts};

use candidates::select_candidates;
use classify::{cull_value, segment_curve};

/// One face of a split plank with its center curve and cull value.
struct Segment<K: GeometryKernel> {
    face: K::Brep,
    curve: K::Curve,
    cull: u32,
}

/// Cuts every plank against the planks of other directions crossing it.
///
/// Each target's mid-surface is split by the gap-inflated solids of the
/// cutters at the same layer and bundle position. Pieces inside a cutter
/// are culled; the rest get solids. The result holds one new plank per
/// target address with its segments ordered along the original center
/// curve.
pub struct NetworkIntersector {
    gap: f64,
    tie_break: TieBreak,
}

impl NetworkIntersector {
    /// Creates a new `NetworkIntersector` with the given cut gap.
    #[must_use]
    pub fn new(gap: f64) -> Self {
        Self {
            gap,
            tie_break: TieBreak::default(),
        }
    }

    /// Creates an intersector using the gap and tie-break of `params`.
    #[must_use]
    pub fn from_params(params: &NetworkParams) -> Self {
        Self::new(params.gap).with_tie_break(params.tie_break)
    }

    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Executes the intersection.
    ///
    /// An empty `cutters` collection means nothing is cut. Otherwise its
    /// address set must equal that of `targets`. Targets whose geometry
    /// fails are left out and reported as diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeGap`] for a negative or infinite
    /// gap and [`ValidationError::StructureMismatch`] if the address sets
    /// differ.
    pub fn execute<K: GeometryKernel>(
        &self,
        kernel: &K,
        targets: &PlankNetwork<Plank<K>>,
        cutters: &PlankNetwork<Plank<K>>,
    ) -> Result<StageReport<PlankNetwork<Plank<K>>>> {
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(ValidationError::NegativeGap(self.gap).into());
        }
        if !cutters.is_empty() {
            let (missing, unexpected) = key_difference(targets, cutters);
            if !missing.is_empty() || !unexpected.is_empty() {
                return Err(ValidationError::StructureMismatch {
                    missing,
                    unexpected,
                }
                .into());
            }
        }

        let mut report = StageReport::new(PlankNetwork::new());

        let started = Instant::now();
        let mut scaled = Vec::with_capacity(cutters.len());
        for (address, plank) in cutters {
            match ScaledCutter::build(kernel, *address, plank, self.gap) {
                Ok(cutter) => scaled.push(cutter),
                Err(err) => report
                    .diagnostics
                    .push(Diagnostic::dropped(Stage::Cutters, Some(*address), &err)),
            }
        }
        let elapsed = started.elapsed();
        tracing::info!(cutters = scaled.len(), ?elapsed, "scaled cutters built");
        report.timings.push(PhaseTiming {
            stage: Stage::Cutters,
            elapsed,
        });

        let started = Instant::now();
        for (address, target) in targets {
            let plank_started = Instant::now();
            match self.intersect_plank(kernel, address, target, &scaled) {
                Ok(plank) => {
                    tracing::debug!(
                        %address,
                        segments = plank.segments().len(),
                        kept = plank.solids().len(),
                        elapsed = ?plank_started.elapsed(),
                        "plank intersected"
                    );
                    report.output.insert(*address, plank);
                }
                Err(err) => report
                    .diagnostics
                    .push(Diagnostic::dropped(Stage::Intersect, Some(*address), &err)),
            }
        }
        let elapsed = started.elapsed();
        tracing::info!(
            planks = report.output.len(),
            dropped = report.diagnostics.len(),
            ?elapsed,
            "network intersected"
        );
        report.timings.push(PhaseTiming {
            stage: Stage::Intersect,
            elapsed,
        });
        Ok(report)
    }

    fn intersect_plank<K: GeometryKernel>(
        &self,
        kernel: &K,
        address: &PlankAddress,
        target: &Plank<K>,
        cutters: &[ScaledCutter<K>],
    ) -> Result<Plank<K>> {
        let candidates = select_candidates(address, cutters, self.tie_break);
        let solids: Vec<K::Solid> = candidates.iter().map(|c| c.solid().clone()).collect();

        let faces = kernel.faces(target.surface());
        if faces.len() != target.segments().len() {
            return Err(LogicError::Invariant(format!(
                "{} faces but {} segment curves",
                faces.len(),
                target.segments().len()
            ))
            .into());
        }

        let mut segments: Vec<Segment<K>> = Vec::new();
        for (l, face) in faces.into_iter().enumerate() {
            let face_center = &target.segments()[l];
            let pieces = if solids.is_empty() {
                Vec::new()
            } else {
                kernel.split(&face, &solids)?
            };
            if pieces.is_empty() {
                let curve = segment_curve(kernel, segments.len(), &face, face_center, target.refinement())?;
                segments.push(Segment {
                    face,
                    curve,
                    cull: target.cull_values()[l],
                });
                continue;
            }
            for piece in pieces {
                let cull = cull_value(kernel, &piece, &candidates)?;
                let curve = segment_curve(kernel, segments.len(), &piece, face_center, target.refinement())?;
                segments.push(Segment {
                    face: piece,
                    curve,
                    cull,
                });
            }
        }

        let unordered: Vec<K::Curve> = segments.iter().map(|s| s.curve.clone()).collect();
        let order = order_along_curve(kernel, target.center(), &unordered);
        let mut slots: Vec<Option<Segment<K>>> = segments.into_iter().map(Some).collect();

        let mut faces = Vec::with_capacity(order.len());
        let mut curves = Vec::with_capacity(order.len());
        let mut cull_values = Vec::with_capacity(order.len());
        let mut kept = Vec::new();
        for i in order {
            let Some(segment) = slots[i].take() else {
                return Err(LogicError::Invariant(format!("segment {i} ordered twice")).into());
            };
            if segment.cull == 0 {
                let solid = kernel.thicken(&segment.face, target.thickness())?;
                kept.push(kernel.normalize_orientation(&solid));
            }
            faces.push(segment.face);
            curves.push(segment.curve);
            cull_values.push(segment.cull);
        }

        Plank::new(PlankParts {
            center: target.center().clone(),
            segments: curves,
            original_surface: target.original_surface().clone(),
            surface: kernel.join_surfaces(&faces)?,
            solids: kept,
            cull_values,
            thickness: target.thickness(),
            width: target.width(),
            length: target.length(),
            refinement: target.refinement(),
            position: target.position(),
        })
    }
}
