use crate::error::{ConstructionError, PlankError, Result};
use crate::math::segment::closest_points_between_segments;
use crate::math::triangle::{closest_point_on_triangle, triangle_area, triangle_centroid};
use crate::math::{lerp, midpoint, unit, Point3, Vector3, TOLERANCE};

use super::Polyline;

/// Number of center-line samples per section span when searching for cuts.
const CUT_SAMPLES_PER_SPAN: usize = 8;

/// Bisection steps used to refine a cut location.
const CUT_BISECTION_STEPS: usize = 48;

/// Area and area centroid of a surface or solid boundary.
#[derive(Debug, Clone, Copy)]
pub struct AreaProperties {
    /// Total area.
    pub area: f64,
    /// Area-weighted centroid.
    pub centroid: Point3,
}

impl AreaProperties {
    pub(crate) fn accumulate<I>(triangles: I) -> Result<Self>
    where
        I: IntoIterator<Item = [Point3; 3]>,
    {
        let mut area = 0.0;
        let mut weighted = Vector3::zeros();
        for [a, b, c] in triangles {
            let tri_area = triangle_area(&a, &b, &c);
            area += tri_area;
            weighted += triangle_centroid(&a, &b, &c).coords * tri_area;
        }
        if area < TOLERANCE {
            return Err(ConstructionError::Degenerate("zero-area geometry".into()).into());
        }
        Ok(Self {
            area,
            centroid: Point3::from(weighted / area),
        })
    }
}

/// A ruled ribbon face: an ordered sequence of straight sections (rulings).
///
/// Section `i` runs from its rail-0 point to its rail-1 point and sits at
/// sweep parameter `knots[i]`; `u` runs along the sweep and `v` across the
/// sections, both normalized to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StripFace {
    sections: Vec<[Point3; 2]>,
    knots: Vec<f64>,
}

impl StripFace {
    /// Lofts a face through ordered sections with uniform sweep parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two sections, a section is
    /// degenerate, or consecutive sections touch (a folded or non-manifold
    /// loft).
    pub fn loft(sections: Vec<[Point3; 2]>) -> Result<Self> {
        if sections.len() < 2 {
            return Err(ConstructionError::Failed {
                operation: "loft",
                reason: format!("need at least two sections, got {}", sections.len()),
            }
            .into());
        }
        for (i, [a, b]) in sections.iter().enumerate() {
            if (b - a).norm() < TOLERANCE {
                return Err(ConstructionError::Failed {
                    operation: "loft",
                    reason: format!("section {i} has zero length"),
                }
                .into());
            }
        }
        for (i, w) in sections.windows(2).enumerate() {
            let pair = closest_points_between_segments(&w[0][0], &w[0][1], &w[1][0], &w[1][1]);
            if pair.distance < TOLERANCE {
                return Err(ConstructionError::Failed {
                    operation: "loft",
                    reason: format!("sections {i} and {} intersect", i + 1),
                }
                .into());
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let last = (sections.len() - 1) as f64;
        #[allow(clippy::cast_precision_loss)]
        let knots = (0..sections.len()).map(|i| i as f64 / last).collect();
        Ok(Self { sections, knots })
    }

    /// Returns the sections.
    #[must_use]
    pub fn sections(&self) -> &[[Point3; 2]] {
        &self.sections
    }

    /// Returns the first section.
    #[must_use]
    pub fn first_section(&self) -> [Point3; 2] {
        self.sections[0]
    }

    /// Returns the last section.
    #[must_use]
    pub fn last_section(&self) -> [Point3; 2] {
        self.sections[self.sections.len() - 1]
    }

    /// Interpolated section at sweep parameter `u`.
    #[must_use]
    pub fn section_at(&self, u: f64) -> [Point3; 2] {
        let u = u.clamp(0.0, 1.0);
        let count = self.knots.partition_point(|&k| k <= u);
        let span = count.saturating_sub(1).min(self.sections.len() - 2);
        let k0 = self.knots[span];
        let k1 = self.knots[span + 1];
        let f = if k1 - k0 < TOLERANCE {
            0.0
        } else {
            ((u - k0) / (k1 - k0)).clamp(0.0, 1.0)
        };
        let [a0, b0] = self.sections[span];
        let [a1, b1] = self.sections[span + 1];
        [lerp(&a0, &a1, f), lerp(&b0, &b1, f)]
    }

    /// Evaluates the face at normalized `(u, v)`.
    #[must_use]
    pub fn evaluate(&self, u: f64, v: f64) -> Point3 {
        let [a, b] = self.section_at(u);
        lerp(&a, &b, v.clamp(0.0, 1.0))
    }

    /// Center-line point at sweep parameter `u`.
    #[must_use]
    pub fn center_at(&self, u: f64) -> Point3 {
        self.evaluate(u, 0.5)
    }

    /// Unit normal at each section, `across × along`.
    ///
    /// # Errors
    ///
    /// Returns an error if a section is parallel to the sweep direction.
    pub fn normals(&self) -> Result<Vec<Vector3>> {
        let mids: Vec<Point3> = self.sections.iter().map(|[a, b]| midpoint(a, b)).collect();
        let n = mids.len();
        (0..n)
            .map(|i| {
                let prev = mids[i.saturating_sub(1)];
                let next = mids[(i + 1).min(n - 1)];
                let along = next - prev;
                let [a, b] = self.sections[i];
                let across = b - a;
                unit(&across.cross(&along)).map_err(|_| {
                    PlankError::from(ConstructionError::Degenerate(format!(
                        "section {i} has no normal"
                    )))
                })
            })
            .collect()
    }

    /// Moves every section along its normal by `distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the normals are degenerate.
    pub fn offset(&self, distance: f64) -> Result<Self> {
        let normals = self.normals()?;
        let sections = self
            .sections
            .iter()
            .zip(&normals)
            .map(|([a, b], n)| [a + n * distance, b + n * distance])
            .collect();
        Ok(Self {
            sections,
            knots: self.knots.clone(),
        })
    }

    /// Extracts the part of the face between sweep parameters `u0 < u1`,
    /// reparameterized to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is empty.
    pub fn sub_strip(&self, u0: f64, u1: f64) -> Result<Self> {
        let (u0, u1) = (u0.clamp(0.0, 1.0), u1.clamp(0.0, 1.0));
        let width = u1 - u0;
        if width < TOLERANCE {
            return Err(ConstructionError::Degenerate("empty strip interval".into()).into());
        }
        let mut sections = vec![self.section_at(u0)];
        let mut knots = vec![0.0];
        for (section, &k) in self.sections.iter().zip(&self.knots) {
            if k - u0 > 1e-9 && u1 - k > 1e-9 {
                sections.push(*section);
                knots.push((k - u0) / width);
            }
        }
        sections.push(self.section_at(u1));
        knots.push(1.0);
        Ok(Self { sections, knots })
    }

    /// Rail through the rail-0 (`side == 0`) or rail-1 endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the rail is degenerate.
    pub fn rail(&self, side: usize) -> Result<Polyline> {
        Polyline::new(self.sections.iter().map(|s| s[side.min(1)]).collect())
    }

    /// Boundary loop as four edges: rail 0, last section, rail 1 reversed,
    /// first section reversed.
    ///
    /// # Errors
    ///
    /// Returns an error if any edge is degenerate.
    pub fn boundary_edges(&self) -> Result<[Polyline; 4]> {
        let [a0, b0] = self.first_section();
        let [a1, b1] = self.last_section();
        Ok([
            self.rail(0)?,
            Polyline::line(a1, b1)?,
            self.rail(1)?.reversed(),
            Polyline::line(b0, a0)?,
        ])
    }

    /// Joined boundary loop with domain `[0, 1]`, a quarter per edge.
    ///
    /// Edges are joined where their ends meet within `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns an error if any edge is degenerate or the edges do not close.
    pub fn outline(&self, tolerance: f64) -> Result<Polyline> {
        Polyline::join(&self.boundary_edges()?, tolerance)
    }

    /// Triangulation of the face, two triangles per section span.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.sections.windows(2).flat_map(|w| {
            let [a0, b0] = w[0];
            let [a1, b1] = w[1];
            [[a0, b0, b1], [a0, b1, a1]]
        })
    }

    /// Area and area centroid.
    ///
    /// # Errors
    ///
    /// Returns an error if the face has zero area.
    pub fn area_properties(&self) -> Result<AreaProperties> {
        AreaProperties::accumulate(self.triangles())
    }

    /// Closest point on the face to `point`.
    #[must_use]
    pub fn closest_point(&self, point: &Point3) -> Point3 {
        let mut best = self.sections[0][0];
        let mut best_dist = f64::INFINITY;
        for [a, b, c] in self.triangles() {
            let q = closest_point_on_triangle(point, &a, &b, &c);
            let d = (point - q).norm();
            if d < best_dist {
                best = q;
                best_dist = d;
            }
        }
        best
    }

    /// Sweep parameters where the center line crosses the boundary of the
    /// region described by `inside`.
    ///
    /// The center line is sampled densely per section span and each change
    /// of state is refined by bisection.
    pub fn center_crossings<F>(&self, inside: F) -> Vec<f64>
    where
        F: Fn(&Point3) -> bool,
    {
        let mut crossings = Vec::new();
        for w in self.knots.windows(2) {
            let (k0, k1) = (w[0], w[1]);
            #[allow(clippy::cast_precision_loss)]
            let step = (k1 - k0) / CUT_SAMPLES_PER_SPAN as f64;
            let mut lo = k0;
            let mut lo_state = inside(&self.center_at(lo));
            for s in 1..=CUT_SAMPLES_PER_SPAN {
                #[allow(clippy::cast_precision_loss)]
                let hi = if s == CUT_SAMPLES_PER_SPAN { k1 } else { k0 + step * s as f64 };
                let hi_state = inside(&self.center_at(hi));
                if hi_state != lo_state {
                    let (mut a, mut b) = (lo, hi);
                    for _ in 0..CUT_BISECTION_STEPS {
                        let m = 0.5 * (a + b);
                        if inside(&self.center_at(m)) == lo_state {
                            a = m;
                        } else {
                            b = m;
                        }
                    }
                    crossings.push(0.5 * (a + b));
                }
                lo = hi;
                lo_state = hi_state;
            }
        }
        crossings
    }
}

/// An ordered collection of strip faces forming one (possibly split) surface.
#[derive(Debug, Clone, PartialEq)]
pub struct StripBrep {
    faces: Vec<StripFace>,
}

impl StripBrep {
    /// Wraps faces into a surface.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::EmptyResult`] if `faces` is empty.
    pub fn new(faces: Vec<StripFace>) -> Result<Self> {
        if faces.is_empty() {
            return Err(ConstructionError::EmptyResult("surface join").into());
        }
        Ok(Self { faces })
    }

    /// Wraps a single face.
    #[must_use]
    pub fn from_face(face: StripFace) -> Self {
        Self { faces: vec![face] }
    }

    /// Returns the faces.
    #[must_use]
    pub fn faces(&self) -> &[StripFace] {
        &self.faces
    }

    /// Returns the first face.
    #[must_use]
    pub fn first_face(&self) -> &StripFace {
        &self.faces[0]
    }

    /// Sections shared by two faces, as straight edges.
    ///
    /// # Errors
    ///
    /// Returns an error if a shared section is degenerate.
    pub fn interior_edges(&self, tolerance: f64) -> Result<Vec<Polyline>> {
        let same = |x: &[Point3; 2], y: &[Point3; 2]| {
            ((x[0] - y[0]).norm() <= tolerance && (x[1] - y[1]).norm() <= tolerance)
                || ((x[0] - y[1]).norm() <= tolerance && (x[1] - y[0]).norm() <= tolerance)
        };
        let mut edges = Vec::new();
        for (i, a) in self.faces.iter().enumerate() {
            for b in &self.faces[i + 1..] {
                for sa in [a.first_section(), a.last_section()] {
                    if same(&sa, &b.first_section()) || same(&sa, &b.last_section()) {
                        edges.push(Polyline::line(sa[0], sa[1])?);
                    }
                }
            }
        }
        Ok(edges)
    }

    /// Merges faces chained end to start into one face.
    ///
    /// # Errors
    ///
    /// Returns an error if consecutive faces do not share a section.
    pub fn merged(&self, tolerance: f64) -> Result<StripFace> {
        let mut sections: Vec<[Point3; 2]> = Vec::new();
        for (i, face) in self.faces.iter().enumerate() {
            let skip = match sections.last() {
                None => 0,
                Some(last) => {
                    let first = face.first_section();
                    if (last[0] - first[0]).norm() > tolerance || (last[1] - first[1]).norm() > tolerance
                    {
                        return Err(ConstructionError::Failed {
                            operation: "surface merge",
                            reason: format!("face {i} is not connected to face {}", i - 1),
                        }
                        .into());
                    }
                    1
                }
            };
            sections.extend(face.sections.iter().skip(skip).copied());
        }
        StripFace::loft(sections)
    }

    /// Area and area centroid over all faces.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface has zero area.
    pub fn area_properties(&self) -> Result<AreaProperties> {
        AreaProperties::accumulate(self.faces.iter().flat_map(|f| f.triangles()))
    }

    /// Closest point over all faces.
    #[must_use]
    pub fn closest_point(&self, point: &Point3) -> Point3 {
        self.faces
            .iter()
            .map(|f| f.closest_point(point))
            .min_by(|a, b| (point - a).norm().total_cmp(&(point - b).norm()))
            .unwrap_or(*point)
    }
}
