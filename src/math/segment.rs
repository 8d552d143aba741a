use super::{Point3, TOLERANCE};

/// Closest point on the segment `[a, b]` to `p`.
///
/// Returns the point and its parameter in `[0, 1]`.
#[must_use]
pub fn closest_point_on_segment(p: &Point3, a: &Point3, b: &Point3) -> (Point3, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return (*a, 0.0);
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Closest pair of points between two segments.
#[derive(Debug, Clone, Copy)]
pub struct SegmentPair {
    /// Parameter on the first segment, in `[0, 1]`.
    pub s: f64,
    /// Parameter on the second segment, in `[0, 1]`.
    pub t: f64,
    /// Closest point on the first segment.
    pub point_a: Point3,
    /// Closest point on the second segment.
    pub point_b: Point3,
    /// Distance between the two points.
    pub distance: f64,
}

/// Computes the closest points between segments `[p1, q1]` and `[p2, q2]`.
///
/// Handles degenerate (point-like) segments and parallel segments; for
/// parallel overlapping segments the first segment's start is preferred.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn closest_points_between_segments(
    p1: &Point3,
    q1: &Point3,
    p2: &Point3,
    q2: &Point3,
) -> SegmentPair {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);
    let eps = TOLERANCE * TOLERANCE;

    let (s, t) = if a <= eps && e <= eps {
        (0.0, 0.0)
    } else if a <= eps {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= eps {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let mut s = if denom > eps {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    let point_a = p1 + d1 * s;
    let point_b = p2 + d2 * t;
    SegmentPair {
        s,
        t,
        point_a,
        point_b,
        distance: (point_a - point_b).norm(),
    }
}
