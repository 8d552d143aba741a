use crate::error::{LogicError, Result};
use crate::kernel::GeometryKernel;
use crate::math::{midpoint, Point3};

use super::cutter::ScaledCutter;

/// Number of cutters strictly containing a representative point of
/// `segment`.
///
/// The point is the closest point on the segment to its area centroid, so
/// it lies on the segment even when the segment is not convex.
pub(crate) fn cull_value<K: GeometryKernel>(
    kernel: &K,
    segment: &K::Brep,
    cutters: &[&ScaledCutter<K>],
) -> Result<u32> {
    let centroid = kernel.area_properties(segment)?.centroid;
    let probe = kernel.closest_point_on_surface(segment, &centroid);
    let mut cull = 0;
    for cutter in cutters {
        if kernel.contains_point(cutter.solid(), &probe, true) {
            cull += 1;
        }
    }
    Ok(cull)
}

/// Rebuilds the center curve of a segment face.
///
/// The two boundary edges that do not meet `face_center` (the center curve
/// of the face the segment was cut from) run along the sweep. They are
/// sampled at matching arc-length fractions, the second one backwards, and
/// the midpoints of each pair are fitted with a curve.
///
/// # Errors
///
/// Returns [`LogicError::ParallelEdgeCount`] if fewer than two such edges
/// exist, or a construction error from the kernel.
pub(crate) fn segment_curve<K: GeometryKernel>(
    kernel: &K,
    index: usize,
    segment: &K::Brep,
    face_center: &K::Curve,
    refinement: usize,
) -> Result<K::Curve> {
    let parallel: Vec<K::Curve> = kernel
        .face_edges(segment)?
        .into_iter()
        .filter(|edge| {
            kernel
                .intersect_curves(face_center, edge, kernel.tolerance())
                .is_empty()
        })
        .collect();
    let [first, second, ..] = parallel.as_slice() else {
        return Err(LogicError::ParallelEdgeCount {
            segment: index,
            found: parallel.len(),
        }
        .into());
    };

    let refinement = refinement.max(1);
    #[allow(clippy::cast_precision_loss)]
    let n = refinement as f64;
    let samples: Vec<Point3> = (0..=refinement)
        .map(|k| {
            #[allow(clippy::cast_precision_loss)]
            let t = k as f64 / n;
            midpoint(
                &kernel.point_at_normalized_length(first, t),
                &kernel.point_at_normalized_length(second, 1.0 - t),
            )
        })
        .collect();
    kernel.interpolate(&samples)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kernel::StripKernel;
    use crate::math::Point3;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn strip(kernel: &StripKernel, y0: f64, y1: f64) -> crate::geometry::StripBrep {
        kernel
            .loft(&[
                kernel.line(p(-0.05, y0, 0.0), p(0.05, y0, 0.0)).unwrap(),
                kernel.line(p(-0.05, y1, 0.0), p(0.05, y1, 0.0)).unwrap(),
            ])
            .unwrap()
    }

    #[test]
    fn segment_curve_follows_rails() {
        let kernel = StripKernel::default();
        let face_center = kernel.line(p(0.0, -0.5, 0.0), p(0.0, 0.5, 0.0)).unwrap();
        let piece = strip(&kernel, 0.05, 0.5);
        let curve = segment_curve(&kernel, 0, &piece, &face_center, 4).unwrap();
        assert!((kernel.point_at(&curve, 0.0) - p(0.0, 0.05, 0.0)).norm() < 1e-12);
        assert!((kernel.point_at(&curve, 1.0) - p(0.0, 0.5, 0.0)).norm() < 1e-12);
        assert_relative_eq!(kernel.length(&curve), 0.45, epsilon = 1e-12);
    }

    #[test]
    fn segment_curve_needs_two_parallel_edges() {
        let kernel = StripKernel::default();
        // A center curve running across the face touches every edge.
        let across = kernel
            .interpolate(&[
                p(-0.05, 0.0, 0.0),
                p(0.05, 0.0, 0.0),
                p(0.05, 1.0, 0.0),
                p(-0.05, 1.0, 0.0),
            ])
            .unwrap();
        let err = segment_curve(&kernel, 3, &strip(&kernel, 0.0, 1.0), &across, 4).unwrap_err();
        assert!(matches!(
            err,
            crate::PlankError::Logic(LogicError::ParallelEdgeCount {
                segment: 3,
                found: 0
            })
        ));
    }
}
