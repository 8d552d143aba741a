mod strip_kernel;

pub use strip_kernel::StripKernel;

use std::fmt::Debug;

use crate::error::Result;
use crate::geometry::AreaProperties;
use crate::math::{Point3, Vector3};

/// One place where two curves meet within a tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    /// Point on the first curve.
    pub point_a: Point3,
    /// Point on the second curve.
    pub point_b: Point3,
    /// Normalized parameter on the first curve.
    pub parameter_a: f64,
    /// Normalized parameter on the second curve.
    pub parameter_b: f64,
}

/// Capability surface of the solid-modeling kernel.
///
/// Every curve and surface parameter exchanged through this trait is
/// normalized to `[0, 1]`. Implementations must use [`tolerance`] for every
/// predicate that does not take an explicit tolerance.
///
/// [`tolerance`]: GeometryKernel::tolerance
pub trait GeometryKernel {
    /// Curve representation.
    type Curve: Clone + Debug;
    /// Surface (one or more faces) representation.
    type Brep: Clone + Debug;
    /// Closed solid representation.
    type Solid: Clone + Debug;

    /// Model tolerance shared by all predicates.
    fn tolerance(&self) -> f64;

    // --- Curves ---

    /// Straight curve between two points.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    fn line(&self, start: Point3, end: Point3) -> Result<Self::Curve>;

    /// Curve fitted through `points` in order.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two distinct points are given.
    fn interpolate(&self, points: &[Point3]) -> Result<Self::Curve>;

    /// Point at normalized parameter `t`.
    fn point_at(&self, curve: &Self::Curve, t: f64) -> Point3;

    /// Unit tangent at normalized parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    fn tangent_at(&self, curve: &Self::Curve, t: f64) -> Result<Vector3>;

    /// Point at a fraction `s` of the arc length.
    fn point_at_normalized_length(&self, curve: &Self::Curve, s: f64) -> Point3;

    /// Normalized parameter of the closest point on `curve`.
    fn closest_parameter(&self, curve: &Self::Curve, point: &Point3) -> f64;

    /// Arc length.
    fn length(&self, curve: &Self::Curve) -> f64;

    /// Joins curves end to end, reversing pieces as needed.
    ///
    /// Pieces that cannot be chained start new curves, so the result may
    /// hold several curves.
    fn join_curves(&self, curves: &[Self::Curve]) -> Vec<Self::Curve>;

    /// Extends both ends of a curve along its end tangents.
    ///
    /// # Errors
    ///
    /// Returns an error if an end tangent is degenerate.
    fn extend(&self, curve: &Self::Curve, distance: f64) -> Result<Self::Curve>;

    /// All places where `a` and `b` meet within `tolerance`, ordered along `a`.
    fn intersect_curves(&self, a: &Self::Curve, b: &Self::Curve, tolerance: f64) -> Vec<CurveHit>;

    // --- Surfaces ---

    /// Lofts a ribbon through ordered cross-section curves.
    ///
    /// # Errors
    ///
    /// Returns an error if the sections are degenerate or fold over.
    fn loft(&self, sections: &[Self::Curve]) -> Result<Self::Brep>;

    /// Ruled strip spanning two rails; the rails become its long edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the strip is degenerate.
    fn ruled(&self, rail_a: &Self::Curve, rail_b: &Self::Curve) -> Result<Self::Brep>;

    /// Point on the first face at normalized `(u, v)`.
    fn evaluate_surface(&self, surface: &Self::Brep, u: f64, v: f64) -> Point3;

    /// Surface moved along its normal by `distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the normals are degenerate.
    fn offset_surface(&self, surface: &Self::Brep, distance: f64) -> Result<Self::Brep>;

    /// Solid made by offsetting `surface` by `-thickness / 2` and extruding
    /// by `thickness`, oriented outward.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset or extrusion fails.
    fn thicken(&self, surface: &Self::Brep, thickness: f64) -> Result<Self::Solid>;

    /// Each face of `surface` as its own single-face surface.
    fn faces(&self, surface: &Self::Brep) -> Vec<Self::Brep>;

    /// Boundary edges of a single-face surface, as a loop.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is degenerate.
    fn face_edges(&self, face: &Self::Brep) -> Result<Vec<Self::Curve>>;

    /// Edges shared by two faces.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is degenerate.
    fn interior_edges(&self, surface: &Self::Brep) -> Result<Vec<Self::Curve>>;

    /// Joined naked boundary of `surface`, domain `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary cannot be joined into one loop.
    fn outline(&self, surface: &Self::Brep) -> Result<Self::Curve>;

    /// Splits a single-face surface against a set of solids.
    ///
    /// Returns an empty list when the face is not cut.
    ///
    /// # Errors
    ///
    /// Returns an error if a resulting piece is degenerate.
    fn split(&self, face: &Self::Brep, cutters: &[Self::Solid]) -> Result<Vec<Self::Brep>>;

    /// Joins faces into one surface, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns an error if there is nothing to join.
    fn join_surfaces(&self, pieces: &[Self::Brep]) -> Result<Self::Brep>;

    /// Area and area centroid of a surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface has zero area.
    fn area_properties(&self, surface: &Self::Brep) -> Result<AreaProperties>;

    /// Closest point on `surface` to `point`.
    fn closest_point_on_surface(&self, surface: &Self::Brep, point: &Point3) -> Point3;

    // --- Solids ---

    /// Returns the solid with outward-facing orientation.
    fn normalize_orientation(&self, solid: &Self::Solid) -> Self::Solid;

    /// Oriented point containment.
    ///
    /// With `strict`, points on the boundary (within [`tolerance`]) are
    /// outside.
    ///
    /// [`tolerance`]: GeometryKernel::tolerance
    fn contains_point(&self, solid: &Self::Solid, point: &Point3, strict: bool) -> bool;
}
