use super::{Point3, Vector3};

/// Closest point on triangle `(a, b, c)` to `p`.
///
/// Region-based projection (vertex, edge and face Voronoi regions).
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn closest_point_on_triangle(p: &Point3, a: &Point3, b: &Point3, c: &Point3) -> Point3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// Area of triangle `(a, b, c)`.
#[must_use]
pub fn triangle_area(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    (b - a).cross(&(c - a)).norm() * 0.5
}

/// Centroid of triangle `(a, b, c)`.
#[must_use]
pub fn triangle_centroid(a: &Point3, b: &Point3, c: &Point3) -> Point3 {
    Point3::from((a.coords + b.coords + c.coords) / 3.0)
}

/// Signed solid angle subtended by triangle `(a, b, c)` at `p`.
///
/// Positive when the triangle's counter-clockwise side faces away from `p`.
/// Summed over a closed outward-oriented mesh this yields `4π` for interior
/// points and `0` for exterior ones.
#[must_use]
pub fn solid_angle(p: &Point3, a: &Point3, b: &Point3, c: &Point3) -> f64 {
    let ra: Vector3 = a - p;
    let rb: Vector3 = b - p;
    let rc: Vector3 = c - p;
    let la = ra.norm();
    let lb = rb.norm();
    let lc = rc.norm();
    let numerator = ra.dot(&rb.cross(&rc));
    let denominator = la * lb * lc + ra.dot(&rb) * lc + ra.dot(&rc) * lb + rb.dot(&rc) * la;
    2.0 * numerator.atan2(denominator)
}

/// Signed volume contribution of triangle `(a, b, c)` relative to the origin.
#[must_use]
pub fn signed_volume(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;
    use std::f64::consts::PI;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn closest_point_face_region() {
        let q = closest_point_on_triangle(
            &p(0.25, 0.25, 3.0),
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
        );
        assert!((q - p(0.25, 0.25, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn closest_point_vertex_and_edge_regions() {
        let a = p(0.0, 0.0, 0.0);
        let b = p(1.0, 0.0, 0.0);
        let c = p(0.0, 1.0, 0.0);
        let q = closest_point_on_triangle(&p(-1.0, -1.0, 0.0), &a, &b, &c);
        assert!((q - a).norm() < TOLERANCE);
        let q = closest_point_on_triangle(&p(0.5, -2.0, 1.0), &a, &b, &c);
        assert!((q - p(0.5, 0.0, 0.0)).norm() < TOLERANCE);
        let q = closest_point_on_triangle(&p(1.0, 1.0, 0.0), &a, &b, &c);
        assert!((q - p(0.5, 0.5, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn solid_angle_of_octant_triangle() {
        // The triangle spanning the three unit axes covers one octant: 4π / 8.
        let omega = solid_angle(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            &p(0.0, 0.0, 1.0),
        );
        assert!((omega - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn area_and_centroid() {
        let a = p(0.0, 0.0, 0.0);
        let b = p(2.0, 0.0, 0.0);
        let c = p(0.0, 2.0, 0.0);
        assert!((triangle_area(&a, &b, &c) - 2.0).abs() < TOLERANCE);
        let g = triangle_centroid(&a, &b, &c);
        assert!((g - p(2.0 / 3.0, 2.0 / 3.0, 0.0)).norm() < TOLERANCE);
    }
}
