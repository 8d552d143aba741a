use crate::error::{ConstructionError, Result};
use crate::kernel::CurveHit;
use crate::math::segment::{closest_point_on_segment, closest_points_between_segments};
use crate::math::{lerp, unit, Point3, Vector3, TOLERANCE};

/// A piecewise-linear curve with an explicit parameter per vertex.
///
/// The parameter domain is always `[0, 1]`. Curves built from points use
/// chord-length knots; joined curves give every joined piece an equal share
/// of the domain so that curves with the same piece structure can exchange
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point3>,
    knots: Vec<f64>,
}

impl Polyline {
    /// Creates a chord-length parameterized polyline through `points`.
    ///
    /// Consecutive coincident points are collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::Degenerate`] if fewer than two distinct
    /// points remain.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        let mut distinct: Vec<Point3> = Vec::with_capacity(points.len());
        for p in points {
            if distinct.last().is_none_or(|last| (p - *last).norm() > TOLERANCE) {
                distinct.push(p);
            }
        }
        if distinct.len() < 2 {
            return Err(ConstructionError::Degenerate(
                "polyline needs at least two distinct points".into(),
            )
            .into());
        }

        let mut lengths = Vec::with_capacity(distinct.len());
        let mut acc = 0.0;
        lengths.push(0.0);
        for w in distinct.windows(2) {
            acc += (w[1] - w[0]).norm();
            lengths.push(acc);
        }
        let knots = lengths.into_iter().map(|l| l / acc).collect();
        Ok(Self {
            points: distinct,
            knots,
        })
    }

    /// Creates a straight two-point polyline.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints coincide.
    pub fn line(start: Point3, end: Point3) -> Result<Self> {
        Self::new(vec![start, end])
    }

    /// Returns the vertices.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns the vertex parameters.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Returns the first vertex.
    #[must_use]
    pub fn start(&self) -> Point3 {
        self.points[0]
    }

    /// Returns the last vertex.
    #[must_use]
    pub fn end(&self) -> Point3 {
        self.points[self.points.len() - 1]
    }

    /// Returns `true` if the first and last vertices coincide.
    #[must_use]
    pub fn is_closed(&self, tolerance: f64) -> bool {
        (self.start() - self.end()).norm() <= tolerance
    }

    /// Total arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    fn span_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Locates `t` as `(span index, fraction within span)`.
    fn locate(&self, t: f64) -> (usize, f64) {
        let t = t.clamp(0.0, 1.0);
        let count = self.knots.partition_point(|&k| k <= t);
        let span = count.saturating_sub(1).min(self.span_count() - 1);
        let k0 = self.knots[span];
        let k1 = self.knots[span + 1];
        let width = k1 - k0;
        if width < TOLERANCE {
            return (span, 0.0);
        }
        (span, ((t - k0) / width).clamp(0.0, 1.0))
    }

    fn span_parameter(&self, span: usize, fraction: f64) -> f64 {
        self.knots[span] + (self.knots[span + 1] - self.knots[span]) * fraction
    }

    fn span_direction(&self, span: usize) -> Result<Vector3> {
        unit(&(self.points[span + 1] - self.points[span]))
    }

    /// Evaluates the curve at normalized parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        let (span, f) = self.locate(t);
        lerp(&self.points[span], &self.points[span + 1], f)
    }

    /// Unit tangent at normalized parameter `t`.
    ///
    /// At interior vertices the directions of both adjacent spans are
    /// averaged.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate (a cusp folding back).
    pub fn tangent_at(&self, t: f64) -> Result<Vector3> {
        let (span, f) = self.locate(t);
        let dir = self.span_direction(span)?;
        if f < 1e-12 && span > 0 {
            let prev = self.span_direction(span - 1)?;
            return unit(&(prev + dir));
        }
        Ok(dir)
    }

    /// Evaluates the point at a fraction `s` of the total arc length.
    #[must_use]
    pub fn point_at_length_fraction(&self, s: f64) -> Point3 {
        let target = s.clamp(0.0, 1.0) * self.length();
        let mut acc = 0.0;
        for w in self.points.windows(2) {
            let len = (w[1] - w[0]).norm();
            if acc + len >= target {
                let f = if len < TOLERANCE { 0.0 } else { (target - acc) / len };
                return lerp(&w[0], &w[1], f.clamp(0.0, 1.0));
            }
            acc += len;
        }
        self.end()
    }

    /// Finds the closest point on the curve, returning `(parameter, point)`.
    ///
    /// Ties resolve to the lowest parameter.
    #[must_use]
    pub fn closest(&self, point: &Point3) -> (f64, Point3) {
        let mut best = (0.0, self.start(), f64::INFINITY);
        for span in 0..self.span_count() {
            let (q, f) =
                closest_point_on_segment(point, &self.points[span], &self.points[span + 1]);
            let d = (point - q).norm();
            if d < best.2 {
                best = (self.span_parameter(span, f), q, d);
            }
        }
        (best.0, best.1)
    }

    /// Returns the curve with its direction reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
            knots: self.knots.iter().rev().map(|k| 1.0 - k).collect(),
        }
    }

    /// Extends both ends along their end tangents by `distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if an end span is degenerate.
    pub fn extended(&self, distance: f64) -> Result<Self> {
        if distance.abs() < TOLERANCE {
            return Ok(self.clone());
        }
        let n = self.points.len();
        let head = self.span_direction(0)?;
        let tail = self.span_direction(n - 2)?;
        let mut points = self.points.clone();
        points[0] -= head * distance;
        points[n - 1] += tail * distance;
        Self::new(points)
    }

    /// Joins ordered, end-to-end pieces into one curve.
    ///
    /// Each piece receives an equal share of the `[0, 1]` domain.
    ///
    /// # Errors
    ///
    /// Returns an error if `pieces` is empty or consecutive pieces do not
    /// meet within `tolerance`.
    pub fn join(pieces: &[Polyline], tolerance: f64) -> Result<Self> {
        let Some(first) = pieces.first() else {
            return Err(ConstructionError::EmptyResult("curve join").into());
        };
        #[allow(clippy::cast_precision_loss)]
        let share = 1.0 / pieces.len() as f64;
        let mut points = vec![first.start()];
        let mut knots = vec![0.0];
        for (i, piece) in pieces.iter().enumerate() {
            let last = points[points.len() - 1];
            if (piece.start() - last).norm() > tolerance {
                return Err(ConstructionError::Failed {
                    operation: "curve join",
                    reason: format!("piece {i} does not start where piece {} ends", i.max(1) - 1),
                }
                .into());
            }
            #[allow(clippy::cast_precision_loss)]
            let base = i as f64 * share;
            for (p, k) in piece.points.iter().zip(&piece.knots).skip(1) {
                points.push(*p);
                knots.push(base + k * share);
            }
        }
        let n = knots.len();
        knots[n - 1] = 1.0;
        Ok(Self { points, knots })
    }

    /// Finds all places where this curve passes within `tolerance` of `other`.
    ///
    /// Hits closer than `tolerance` to each other are merged, keeping the
    /// closer approach. Results are sorted by the parameter on `self`.
    #[must_use]
    pub fn intersections(&self, other: &Polyline, tolerance: f64) -> Vec<CurveHit> {
        let mut hits: Vec<(CurveHit, f64)> = Vec::new();
        for i in 0..self.span_count() {
            for j in 0..other.span_count() {
                let pair = closest_points_between_segments(
                    &self.points[i],
                    &self.points[i + 1],
                    &other.points[j],
                    &other.points[j + 1],
                );
                if pair.distance > tolerance {
                    continue;
                }
                let hit = CurveHit {
                    point_a: pair.point_a,
                    point_b: pair.point_b,
                    parameter_a: self.span_parameter(i, pair.s),
                    parameter_b: other.span_parameter(j, pair.t),
                };
                match hits
                    .iter_mut()
                    .find(|(h, _)| (h.point_a - hit.point_a).norm() <= tolerance)
                {
                    Some(existing) if pair.distance < existing.1 => *existing = (hit, pair.distance),
                    Some(_) => {}
                    None => hits.push((hit, pair.distance)),
                }
            }
        }
        let mut hits: Vec<CurveHit> = hits.into_iter().map(|(h, _)| h).collect();
        hits.sort_by(|a, b| a.parameter_a.total_cmp(&b.parameter_a));
        hits
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn l_shape() -> Polyline {
        Polyline::new(vec![p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0), p(3.0, 1.0, 0.0)]).unwrap()
    }

    #[test]
    fn chord_length_knots() {
        let c = l_shape();
        assert_relative_eq!(c.knots()[1], 0.75);
        assert_relative_eq!(c.length(), 4.0);
        assert!((c.point_at(0.5) - p(2.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn collapses_duplicate_points() {
        let c = Polyline::new(vec![p(0.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]).unwrap();
        assert_eq!(c.points().len(), 2);
        assert!(Polyline::new(vec![p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0)]).is_err());
    }

    #[test]
    fn tangent_averages_at_corner() {
        let c = l_shape();
        let t = c.tangent_at(0.75).unwrap();
        let expected = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert!((t - expected).norm() < 1e-12);
        assert!((c.tangent_at(0.2).unwrap() - Vector3::x()).norm() < 1e-12);
    }

    #[test]
    fn closest_returns_parameter() {
        let c = l_shape();
        let (t, q) = c.closest(&p(3.5, 0.5, 0.0));
        assert_relative_eq!(t, 0.875);
        assert!((q - p(3.0, 0.5, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn reversed_preserves_points() {
        let c = l_shape();
        let r = c.reversed();
        for t in [0.0, 0.3, 0.75, 1.0] {
            assert!((c.point_at(t) - r.point_at(1.0 - t)).norm() < 1e-12);
        }
    }

    #[test]
    fn extended_line() {
        let c = Polyline::line(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();
        let e = c.extended(0.5).unwrap();
        assert!((e.start() - p(-0.5, 0.0, 0.0)).norm() < 1e-12);
        assert!((e.end() - p(1.5, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn join_gives_equal_shares() {
        let a = Polyline::line(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)).unwrap();
        let b = Polyline::line(p(10.0, 0.0, 0.0), p(10.0, 1.0, 0.0)).unwrap();
        let j = Polyline::join(&[a, b], 1e-9).unwrap();
        assert!((j.point_at(0.5) - p(10.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((j.point_at(0.75) - p(10.0, 0.5, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn join_rejects_gaps() {
        let a = Polyline::line(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();
        let b = Polyline::line(p(2.0, 0.0, 0.0), p(3.0, 0.0, 0.0)).unwrap();
        assert!(Polyline::join(&[a, b], 1e-9).is_err());
    }

    #[test]
    fn crossing_hit_is_merged_across_spans() {
        let a = Polyline::new(vec![p(-1.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]).unwrap();
        let b = Polyline::line(p(0.0, -1.0, 0.0), p(0.0, 1.0, 0.0)).unwrap();
        let hits = a.intersections(&b, 1e-6);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].parameter_a, 0.5);
        assert_relative_eq!(hits[0].parameter_b, 0.5);
    }

    #[test]
    fn near_miss_respects_tolerance() {
        let a = Polyline::line(p(-1.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();
        let b = Polyline::line(p(0.0, -1.0, 0.01), p(0.0, 1.0, 0.01)).unwrap();
        assert!(a.intersections(&b, 1e-3).is_empty());
        assert_eq!(a.intersections(&b, 0.02).len(), 1);
    }
}
