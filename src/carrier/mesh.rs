use crate::error::{ConstructionError, Result};
use crate::math::triangle::closest_point_on_triangle;
use crate::math::{unit, Point3, Vector3, TOLERANCE};

use super::{Carrier, CarrierPoint};

/// Carrier backed by a triangle mesh.
///
/// Without vertex normals the normal of the closest face is used; with them
/// the normal is interpolated barycentrically across that face.
#[derive(Debug, Clone)]
pub struct MeshCarrier {
    vertices: Vec<Point3>,
    triangles: Vec<[usize; 3]>,
    vertex_normals: Option<Vec<Vector3>>,
}

impl MeshCarrier {
    /// Creates a mesh carrier with face normals.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is empty or a triangle index is out of
    /// range.
    pub fn new(vertices: Vec<Point3>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        if triangles.is_empty() {
            return Err(ConstructionError::EmptyResult("carrier mesh").into());
        }
        if let Some(i) = triangles
            .iter()
            .position(|t| t.iter().any(|&v| v >= vertices.len()))
        {
            return Err(ConstructionError::Degenerate(format!(
                "carrier triangle {i} references a missing vertex"
            ))
            .into());
        }
        Ok(Self {
            vertices,
            triangles,
            vertex_normals: None,
        })
    }

    /// Attaches per-vertex normals, switching to interpolated normals.
    ///
    /// # Errors
    ///
    /// Returns an error if the count does not match the vertex count.
    pub fn with_vertex_normals(mut self, normals: Vec<Vector3>) -> Result<Self> {
        if normals.len() != self.vertices.len() {
            return Err(ConstructionError::Failed {
                operation: "carrier mesh",
                reason: format!(
                    "{} vertex normals for {} vertices",
                    normals.len(),
                    self.vertices.len()
                ),
            }
            .into());
        }
        self.vertex_normals = Some(normals);
        Ok(self)
    }

    /// Returns the vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Returns the triangle indices.
    #[must_use]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    fn corners(&self, triangle: usize) -> [Point3; 3] {
        let [a, b, c] = self.triangles[triangle];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    fn normal_at(&self, triangle: usize, point: &Point3) -> Result<Vector3> {
        let [a, b, c] = self.corners(triangle);
        let face = unit(&(b - a).cross(&(c - a))).map_err(|_| {
            ConstructionError::Degenerate(format!("carrier triangle {triangle} has zero area"))
        })?;
        let Some(normals) = &self.vertex_normals else {
            return Ok(face);
        };
        let [ia, ib, ic] = self.triangles[triangle];
        let [wa, wb, wc] = barycentric(point, &a, &b, &c);
        let blended = normals[ia] * wa + normals[ib] * wb + normals[ic] * wc;
        unit(&blended).map_err(|_| {
            ConstructionError::Degenerate(format!(
                "interpolated normal vanishes on carrier triangle {triangle}"
            ))
            .into()
        })
    }
}

impl Carrier for MeshCarrier {
    fn closest_point(&self, query: &Point3, tolerance: f64) -> Result<CarrierPoint> {
        let mut best: Option<(usize, Point3, f64)> = None;
        for i in 0..self.triangles.len() {
            let [a, b, c] = self.corners(i);
            let q = closest_point_on_triangle(query, &a, &b, &c);
            let d = (query - q).norm();
            // Faces at equal distance within tolerance keep the first hit.
            if best.is_none_or(|(_, _, bd)| d < bd - tolerance) {
                best = Some((i, q, d));
            }
        }
        let Some((triangle, point, _)) = best else {
            return Err(ConstructionError::EmptyResult("carrier projection").into());
        };
        Ok(CarrierPoint {
            point,
            normal: self.normal_at(triangle, &point)?,
        })
    }
}

/// Barycentric weights of `p` with respect to triangle `(a, b, c)`.
fn barycentric(p: &Point3, a: &Point3, b: &Point3, c: &Point3) -> [f64; 3] {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < TOLERANCE {
        return [1.0, 0.0, 0.0];
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    [1.0 - v - w, v, w]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn square() -> MeshCarrier {
        MeshCarrier::new(
            vec![
                p(-1.0, -1.0, 0.0),
                p(1.0, -1.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(-1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn face_normal_projection() {
        let cp = square().closest_point(&p(0.3, -0.2, 0.7), 1e-6).unwrap();
        assert!((cp.point - p(0.3, -0.2, 0.0)).norm() < 1e-12);
        assert!((cp.normal - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn interpolated_vertex_normals() {
        let tilted = Vector3::new(1.0, 0.0, 1.0).normalize();
        let mesh = square()
            .with_vertex_normals(vec![Vector3::z(), tilted, tilted, Vector3::z()])
            .unwrap();
        let left = mesh.closest_point(&p(-1.0, 0.0, 1.0), 1e-6).unwrap();
        assert!((left.normal - Vector3::z()).norm() < 1e-9);
        let right = mesh.closest_point(&p(1.0, 0.0, 1.0), 1e-6).unwrap();
        assert!((right.normal - tilted).norm() < 1e-9);
        let middle = mesh.closest_point(&p(0.0, 0.0, 1.0), 1e-6).unwrap();
        assert!(middle.normal.x > 0.0 && middle.normal.x < tilted.x);
    }

    #[test]
    fn barycentric_weights_sum_to_one() {
        let w = barycentric(
            &p(0.25, 0.25, 0.0),
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(w[0], 0.5);
        assert_relative_eq!(w[1], 0.25);
        assert_relative_eq!(w[2], 0.25);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(MeshCarrier::new(vec![p(0.0, 0.0, 0.0)], Vec::new()).is_err());
        assert!(MeshCarrier::new(vec![p(0.0, 0.0, 0.0)], vec![[0, 1, 2]]).is_err());
        assert!(square().with_vertex_normals(vec![Vector3::z()]).is_err());
    }
}
