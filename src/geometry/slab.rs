use std::f64::consts::PI;

use crate::error::{ConstructionError, Result};
use crate::math::triangle::{closest_point_on_triangle, signed_volume, solid_angle};
use crate::math::{Point3, TOLERANCE};

use super::strip::StripFace;

/// A closed triangulated solid.
///
/// Built by thickening strip faces symmetrically about their mid-surface.
/// Several slabs may be merged into one solid; coincident internal caps
/// cancel out in the winding-number classification.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabSolid {
    vertices: Vec<Point3>,
    triangles: Vec<[usize; 3]>,
}

impl SlabSolid {
    /// Thickens a face by `thickness`, half on each side of the face.
    ///
    /// The result is oriented outward.
    ///
    /// # Errors
    ///
    /// Returns an error if the thickness is not positive or the face normals
    /// are degenerate.
    pub fn from_face(face: &StripFace, thickness: f64) -> Result<Self> {
        if thickness < TOLERANCE {
            return Err(ConstructionError::Failed {
                operation: "thicken",
                reason: format!("thickness must be positive, got {thickness}"),
            }
            .into());
        }
        let half = thickness / 2.0;
        let normals = face.normals()?;
        let mut vertices = Vec::with_capacity(face.sections().len() * 4);
        for ([a, b], n) in face.sections().iter().zip(&normals) {
            vertices.push(a - n * half);
            vertices.push(a + n * half);
            vertices.push(b - n * half);
            vertices.push(b + n * half);
        }

        // Per section: 0 = rail-0 bottom, 1 = rail-0 top, 2 = rail-1 bottom, 3 = rail-1 top.
        let mut quads: Vec<[usize; 4]> = Vec::new();
        for i in 0..face.sections().len() - 1 {
            let s = 4 * i;
            let e = 4 * (i + 1);
            quads.push([s + 1, s + 3, e + 3, e + 1]);
            quads.push([s, e, e + 2, s + 2]);
            quads.push([s, s + 1, e + 1, e]);
            quads.push([s + 2, e + 2, e + 3, s + 3]);
        }
        let last = 4 * (face.sections().len() - 1);
        quads.push([0, 2, 3, 1]);
        quads.push([last + 1, last + 3, last + 2, last]);

        let triangles = quads
            .into_iter()
            .flat_map(|[a, b, c, d]| [[a, b, c], [a, c, d]])
            .collect();
        Ok(Self {
            vertices,
            triangles,
        }
        .oriented_outward())
    }

    /// Merges several solids into one.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::EmptyResult`] if `parts` is empty.
    pub fn merge(parts: Vec<SlabSolid>) -> Result<Self> {
        let mut iter = parts.into_iter();
        let Some(mut merged) = iter.next() else {
            return Err(ConstructionError::EmptyResult("thicken").into());
        };
        for part in iter {
            let base = merged.vertices.len();
            merged.vertices.extend(part.vertices);
            merged
                .triangles
                .extend(part.triangles.into_iter().map(|[a, b, c]| [a + base, b + base, c + base]));
        }
        Ok(merged)
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

    fn corners(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.triangles
            .iter()
            .map(|&[a, b, c]| [self.vertices[a], self.vertices[b], self.vertices[c]])
    }

    /// Signed enclosed volume; negative when the solid is oriented inward.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.corners().map(|[a, b, c]| signed_volume(&a, &b, &c)).sum()
    }

    /// Returns the solid with every triangle reversed.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            triangles: self.triangles.iter().map(|&[a, b, c]| [a, c, b]).collect(),
        }
    }

    /// Returns the solid oriented so that its signed volume is positive.
    #[must_use]
    pub fn oriented_outward(self) -> Self {
        if self.signed_volume() < 0.0 {
            self.flipped()
        } else {
            self
        }
    }

    /// Generalized winding number of `point`: 1 inside an outward solid,
    /// 0 outside, -1 inside an inward one.
    #[must_use]
    pub fn winding_number(&self, point: &Point3) -> f64 {
        let total: f64 = self
            .corners()
            .map(|[a, b, c]| solid_angle(point, &a, &b, &c))
            .sum();
        total / (4.0 * PI)
    }

    /// Distance from `point` to the boundary.
    #[must_use]
    pub fn boundary_distance(&self, point: &Point3) -> f64 {
        self.corners()
            .map(|[a, b, c]| (point - closest_point_on_triangle(point, &a, &b, &c)).norm())
            .fold(f64::INFINITY, f64::min)
    }

    /// Oriented containment test.
    ///
    /// With `strict`, points within `tolerance` of the boundary are outside.
    #[must_use]
    pub fn contains(&self, point: &Point3, tolerance: f64, strict: bool) -> bool {
        if self.winding_number(point) <= 0.5 {
            return false;
        }
        !strict || self.boundary_distance(point) > tolerance
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

    fn slab() -> SlabSolid {
        let face = StripFace::loft(vec![
            [p(-0.5, -1.0, 0.0), p(0.5, -1.0, 0.0)],
            [p(-0.5, 0.0, 0.0), p(0.5, 0.0, 0.0)],
            [p(-0.5, 1.0, 0.0), p(0.5, 1.0, 0.0)],
        ])
        .unwrap();
        SlabSolid::from_face(&face, 0.2).unwrap()
    }

    #[test]
    fn volume_is_positive_box() {
        assert_relative_eq!(slab().signed_volume(), 0.4, epsilon = 1e-12);
        assert_relative_eq!(slab().flipped().signed_volume(), -0.4, epsilon = 1e-12);
    }

    #[test]
    fn winding_inside_and_outside() {
        let s = slab();
        assert_relative_eq!(s.winding_number(&p(0.1, 0.3, 0.05)), 1.0, epsilon = 1e-9);
        assert_relative_eq!(s.winding_number(&p(0.1, 0.3, 0.5)), 0.0, epsilon = 1e-9);
        assert_relative_eq!(s.flipped().winding_number(&p(0.0, 0.0, 0.0)), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn strict_containment_excludes_boundary() {
        let s = slab();
        let on_top = p(0.0, 0.2, 0.1);
        assert!(!s.contains(&on_top, 1e-6, true));
        assert!(s.contains(&p(0.0, 0.2, 0.0), 1e-6, true));
        assert!(!s.flipped().contains(&p(0.0, 0.2, 0.0), 1e-6, true));
    }

    #[test]
    fn merged_slabs_share_interior() {
        let a = StripFace::loft(vec![
            [p(-0.5, -1.0, 0.0), p(0.5, -1.0, 0.0)],
            [p(-0.5, 0.0, 0.0), p(0.5, 0.0, 0.0)],
        ])
        .unwrap();
        let b = StripFace::loft(vec![
            [p(-0.5, 0.0, 0.0), p(0.5, 0.0, 0.0)],
            [p(-0.5, 1.0, 0.0), p(0.5, 1.0, 0.0)],
        ])
        .unwrap();
        let merged = SlabSolid::merge(vec![
            SlabSolid::from_face(&a, 0.2).unwrap(),
            SlabSolid::from_face(&b, 0.2).unwrap(),
        ])
        .unwrap();
        assert_relative_eq!(merged.winding_number(&p(0.0, -0.5, 0.0)), 1.0, epsilon = 1e-9);
        assert_relative_eq!(merged.winding_number(&p(0.0, 0.5, 0.0)), 1.0, epsilon = 1e-9);
        assert!(SlabSolid::merge(Vec::new()).is_err());
    }
}
