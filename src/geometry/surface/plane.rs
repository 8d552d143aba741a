use crate::error::Result;
use crate::math::{unit, Point3, Vector3};

use super::{Surface, SurfacePoint};

/// Flat carrier: `origin + u * u_dir + v * v_dir`, normal `u_dir x v_dir`.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane through `origin` facing `normal`, with an arbitrary
    /// in-plane frame.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::ZeroVector`](crate::error::ConstructionError::ZeroVector)
    /// if `normal` is zero.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let normal = unit(&normal)?;
        let seed = if normal.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let v_dir = unit(&normal.cross(&seed))?;
        let u_dir = v_dir.cross(&normal);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// The XY plane through the origin with normal `+Z`.
    #[must_use]
    pub fn world_xy() -> Self {
        Self {
            origin: Point3::origin(),
            u_dir: Vector3::x(),
            v_dir: Vector3::y(),
            normal: Vector3::z(),
        }
    }

    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }
}

impl Surface for Plane {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        Ok(self.origin + self.u_dir * u + self.v_dir * v)
    }

    fn normal(&self, _u: f64, _v: f64) -> Result<Vector3> {
        Ok(self.normal)
    }

    fn closest_point(&self, query: &Point3) -> Result<SurfacePoint> {
        let offset = query - self.origin;
        let (u, v) = (offset.dot(&self.u_dir), offset.dot(&self.v_dir));
        let point = self.evaluate(u, v)?;
        Ok(SurfacePoint {
            u,
            v,
            point,
            distance: (query - point).norm(),
        })
    }
}
