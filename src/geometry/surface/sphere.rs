use crate::error::{ConstructionError, Result};
use crate::math::{unit, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfacePoint};

/// Sphere carrier with its pole on the world Z axis.
///
/// `u` is the longitude measured from `+x`, `v` the latitude in
/// `[-pi/2, pi/2]`.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Sphere {
    /// Creates a sphere with the world Z axis as its pole.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(ConstructionError::Degenerate(format!("sphere radius {radius}")).into());
        }
        Ok(Self {
            center,
            radius,
            axis: Vector3::z(),
            ref_dir: Vector3::x(),
        })
    }

    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn side(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    /// Longitude and latitude of a point on the sphere.
    fn angles(&self, point: &Point3) -> (f64, f64) {
        let d = (point - self.center) / self.radius;
        let latitude = d.dot(&self.axis).clamp(-1.0, 1.0).asin();
        let longitude = d.dot(&self.side()).atan2(d.dot(&self.ref_dir));
        (longitude, latitude)
    }
}

impl Surface for Sphere {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_v, cos_v) = v.sin_cos();
        let direction = (self.ref_dir * cos_u + self.side() * sin_u) * cos_v + self.axis * sin_v;
        Ok(self.center + direction * self.radius)
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        unit(&(self.evaluate(u, v)? - self.center))
    }

    fn closest_point(&self, query: &Point3) -> Result<SurfacePoint> {
        let offset = query - self.center;
        let reach = offset.norm();
        if reach < TOLERANCE {
            return Err(
                ConstructionError::Degenerate("point lies at the sphere center".into()).into(),
            );
        }
        let point = self.center + offset * (self.radius / reach);
        let (u, v) = self.angles(&point);
        Ok(SurfacePoint {
            u,
            v,
            point,
            distance: (query - point).norm(),
        })
    }
}
