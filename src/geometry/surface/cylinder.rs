use crate::error::{ConstructionError, Result};
use crate::math::{unit, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfacePoint};

/// Infinite circular cylinder used as a carrier.
///
/// `u` is the angle around `axis` measured from `ref_dir`, `v` the height
/// along `axis` above `center`. Normals point away from the axis.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Cylinder {
    /// Creates a cylinder around the line through `center` along `axis`.
    ///
    /// # Errors
    ///
    /// Returns an error for a radius below [`TOLERANCE`], a zero `axis` or
    /// `ref_dir`, or a `ref_dir` that is not perpendicular to `axis`.
    pub fn new(center: Point3, radius: f64, axis: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(ConstructionError::Degenerate(format!("cylinder radius {radius}")).into());
        }
        let axis = unit(&axis)?;
        let ref_dir = unit(&ref_dir)?;
        if axis.dot(&ref_dir).abs() > TOLERANCE {
            return Err(ConstructionError::Degenerate(
                "cylinder reference direction is not perpendicular to the axis".into(),
            )
            .into());
        }
        Ok(Self {
            center,
            radius,
            axis,
            ref_dir,
        })
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Unit radial direction at angle `u`.
    fn radial(&self, u: f64) -> Vector3 {
        self.ref_dir * u.cos() + self.axis.cross(&self.ref_dir) * u.sin()
    }
}

impl Surface for Cylinder {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        Ok(self.center + self.radial(u) * self.radius + self.axis * v)
    }

    fn normal(&self, u: f64, _v: f64) -> Result<Vector3> {
        unit(&self.radial(u))
    }

    fn closest_point(&self, query: &Point3) -> Result<SurfacePoint> {
        let offset = query - self.center;
        let v = offset.dot(&self.axis);
        let radial = offset - self.axis * v;
        if radial.norm() < TOLERANCE {
            return Err(
                ConstructionError::Degenerate("point lies on the cylinder axis".into()).into(),
            );
        }
        let side = self.axis.cross(&self.ref_dir);
        let u = radial.dot(&side).atan2(radial.dot(&self.ref_dir));
        let point = self.evaluate(u, v)?;
        Ok(SurfacePoint {
            u,
            v,
            point,
            distance: (query - point).norm(),
        })
    }
}
