use crate::error::Result;
use crate::geometry::{AreaProperties, Polyline, SlabSolid, StripBrep, StripFace};
use crate::math::{Point3, Vector3, DEFAULT_MODEL_TOLERANCE};

use super::{CurveHit, GeometryKernel};

/// Reference kernel over polylines, ruled strips and triangulated slabs.
///
/// Surfaces are ruled ribbons, so splits always run along a ruling: a face
/// is cut where its center line crosses a cutter boundary.
#[derive(Debug, Clone, Copy)]
pub struct StripKernel {
    tolerance: f64,
}

impl StripKernel {
    /// Creates a kernel with the given model tolerance.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Default for StripKernel {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_TOLERANCE)
    }
}

impl StripKernel {
    fn close(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() <= self.tolerance
    }

    /// Grows one chain from `remaining`, attaching pieces at either end.
    fn grow_chain(&self, seed: Polyline, remaining: &mut Vec<Polyline>) -> Vec<Polyline> {
        let mut chain = vec![seed];
        loop {
            let head = chain[0].start();
            let tail = chain[chain.len() - 1].end();
            let Some(idx) = remaining.iter().position(|c| {
                self.close(&c.start(), &tail)
                    || self.close(&c.end(), &tail)
                    || self.close(&c.end(), &head)
                    || self.close(&c.start(), &head)
            }) else {
                return chain;
            };
            let piece = remaining.remove(idx);
            if self.close(&piece.start(), &tail) {
                chain.push(piece);
            } else if self.close(&piece.end(), &tail) {
                chain.push(piece.reversed());
            } else if self.close(&piece.end(), &head) {
                chain.insert(0, piece);
            } else {
                chain.insert(0, piece.reversed());
            }
        }
    }
}

impl GeometryKernel for StripKernel {
    type Curve = Polyline;
    type Brep = StripBrep;
    type Solid = SlabSolid;

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn line(&self, start: Point3, end: Point3) -> Result<Polyline> {
        Polyline::line(start, end)
    }

    fn interpolate(&self, points: &[Point3]) -> Result<Polyline> {
        Polyline::new(points.to_vec())
    }

    fn point_at(&self, curve: &Polyline, t: f64) -> Point3 {
        curve.point_at(t)
    }

    fn tangent_at(&self, curve: &Polyline, t: f64) -> Result<Vector3> {
        curve.tangent_at(t)
    }

    fn point_at_normalized_length(&self, curve: &Polyline, s: f64) -> Point3 {
        curve.point_at_length_fraction(s)
    }

    fn closest_parameter(&self, curve: &Polyline, point: &Point3) -> f64 {
        curve.closest(point).0
    }

    fn length(&self, curve: &Polyline) -> f64 {
        curve.length()
    }

    fn join_curves(&self, curves: &[Polyline]) -> Vec<Polyline> {
        let mut remaining = curves.to_vec();
        let mut joined = Vec::new();
        while !remaining.is_empty() {
            let seed = remaining.remove(0);
            let chain = self.grow_chain(seed, &mut remaining);
            match Polyline::join(&chain, self.tolerance) {
                Ok(curve) => joined.push(curve),
                Err(_) => joined.extend(chain),
            }
        }
        joined
    }

    fn extend(&self, curve: &Polyline, distance: f64) -> Result<Polyline> {
        curve.extended(distance)
    }

    fn intersect_curves(&self, a: &Polyline, b: &Polyline, tolerance: f64) -> Vec<CurveHit> {
        a.intersections(b, tolerance)
    }

    fn loft(&self, sections: &[Polyline]) -> Result<StripBrep> {
        let sections = sections.iter().map(|c| [c.start(), c.end()]).collect();
        Ok(StripBrep::from_face(StripFace::loft(sections)?))
    }

    fn ruled(&self, rail_a: &Polyline, rail_b: &Polyline) -> Result<StripBrep> {
        let (a, b) = (rail_a.points(), rail_b.points());
        let sections = if a.len() == b.len() {
            a.iter().zip(b).map(|(p, q)| [*p, *q]).collect()
        } else {
            let count = a.len().max(b.len());
            #[allow(clippy::cast_precision_loss)]
            let last = (count - 1) as f64;
            (0..count)
                .map(|i| {
                    #[allow(clippy::cast_precision_loss)]
                    let s = i as f64 / last;
                    [
                        rail_a.point_at_length_fraction(s),
                        rail_b.point_at_length_fraction(s),
                    ]
                })
                .collect()
        };
        Ok(StripBrep::from_face(StripFace::loft(sections)?))
    }

    fn evaluate_surface(&self, surface: &StripBrep, u: f64, v: f64) -> Point3 {
        surface.first_face().evaluate(u, v)
    }

    fn offset_surface(&self, surface: &StripBrep, distance: f64) -> Result<StripBrep> {
        let faces = surface
            .faces()
            .iter()
            .map(|f| f.offset(distance))
            .collect::<Result<Vec<_>>>()?;
        StripBrep::new(faces)
    }

    fn thicken(&self, surface: &StripBrep, thickness: f64) -> Result<SlabSolid> {
        let parts = surface
            .faces()
            .iter()
            .map(|f| SlabSolid::from_face(f, thickness))
            .collect::<Result<Vec<_>>>()?;
        SlabSolid::merge(parts)
    }

    fn faces(&self, surface: &StripBrep) -> Vec<StripBrep> {
        surface
            .faces()
            .iter()
            .cloned()
            .map(StripBrep::from_face)
            .collect()
    }

    fn face_edges(&self, face: &StripBrep) -> Result<Vec<Polyline>> {
        let mut edges = Vec::new();
        for f in face.faces() {
            edges.extend(f.boundary_edges()?);
        }
        Ok(edges)
    }

    fn interior_edges(&self, surface: &StripBrep) -> Result<Vec<Polyline>> {
        surface.interior_edges(self.tolerance)
    }

    fn outline(&self, surface: &StripBrep) -> Result<Polyline> {
        match surface.faces() {
            [single] => single.outline(self.tolerance),
            _ => surface.merged(self.tolerance)?.outline(self.tolerance),
        }
    }

    fn split(&self, face: &StripBrep, cutters: &[SlabSolid]) -> Result<Vec<StripBrep>> {
        let face = face.first_face();
        let mut cuts: Vec<f64> = cutters
            .iter()
            .flat_map(|c| face.center_crossings(|p| c.contains(p, self.tolerance, false)))
            .collect();
        cuts.sort_by(f64::total_cmp);

        let start = face.center_at(0.0);
        let end = face.center_at(1.0);
        let mut bounds = vec![0.0];
        for u in cuts {
            let at = face.center_at(u);
            let prev = face.center_at(bounds[bounds.len() - 1]);
            if self.close(&at, &start) || self.close(&at, &end) || self.close(&at, &prev) {
                continue;
            }
            bounds.push(u);
        }
        if bounds.len() == 1 {
            return Ok(Vec::new());
        }
        bounds.push(1.0);

        bounds
            .windows(2)
            .map(|w| face.sub_strip(w[0], w[1]).map(StripBrep::from_face))
            .collect()
    }

    fn join_surfaces(&self, pieces: &[StripBrep]) -> Result<StripBrep> {
        StripBrep::new(
            pieces
                .iter()
                .flat_map(|p| p.faces().iter().cloned())
                .collect(),
        )
    }

    fn area_properties(&self, surface: &StripBrep) -> Result<AreaProperties> {
        surface.area_properties()
    }

    fn closest_point_on_surface(&self, surface: &StripBrep, point: &Point3) -> Point3 {
        surface.closest_point(point)
    }

    fn normalize_orientation(&self, solid: &SlabSolid) -> SlabSolid {
        solid.clone().oriented_outward()
    }

    fn contains_point(&self, solid: &SlabSolid, point: &Point3, strict: bool) -> bool {
        solid.contains(point, self.tolerance, strict)
    }
}
