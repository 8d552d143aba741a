mod mesh;

pub use mesh::MeshCarrier;

use crate::error::{ConstructionError, Result};
use crate::geometry::Surface;
use crate::math::{unit, Point3, Vector3};

/// Closest point on a carrier together with the carrier normal there.
#[derive(Debug, Clone, Copy)]
pub struct CarrierPoint {
    /// Closest point on the carrier.
    pub point: Point3,
    /// Unit normal at `point`.
    pub normal: Vector3,
}

/// A surface or mesh that center curves lie on.
///
/// Ribbons are swept across the carrier, so every frame sample needs the
/// closest carrier point and the carrier normal there.
pub trait Carrier {
    /// Projects `query` onto the carrier.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] if the projection is not unique or the
    /// normal is degenerate.
    fn closest_point(&self, query: &Point3, tolerance: f64) -> Result<CarrierPoint>;
}

/// Carrier backed by an analytic surface.
#[derive(Debug, Clone)]
pub struct SurfaceCarrier<S> {
    surface: S,
}

impl<S: Surface> SurfaceCarrier<S> {
    /// Wraps a surface.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Returns the wrapped surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: Surface> Carrier for SurfaceCarrier<S> {
    fn closest_point(&self, query: &Point3, _tolerance: f64) -> Result<CarrierPoint> {
        let sp = self.surface.closest_point(query)?;
        let normal = unit(&self.surface.normal(sp.u, sp.v)?).map_err(|_| {
            ConstructionError::Degenerate(format!(
                "carrier normal vanishes at ({:.6}, {:.6})",
                sp.u, sp.v
            ))
        })?;
        Ok(CarrierPoint {
            point: sp.point,
            normal,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Cylinder, Plane, Sphere};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn plane_carrier_projects_down() {
        let carrier = SurfaceCarrier::new(Plane::world_xy());
        let cp = carrier.closest_point(&p(1.0, 2.0, 3.0), 1e-6).unwrap();
        assert!((cp.point - p(1.0, 2.0, 0.0)).norm() < 1e-12);
        assert!((cp.normal - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn sphere_carrier_normal_is_radial() {
        let carrier = SurfaceCarrier::new(Sphere::new(Point3::origin(), 2.0).unwrap());
        let cp = carrier.closest_point(&p(0.0, 3.0, 0.0), 1e-6).unwrap();
        assert!((cp.point - p(0.0, 2.0, 0.0)).norm() < 1e-9);
        assert_relative_eq!(cp.normal.dot(&Vector3::y()).abs(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn cylinder_carrier_rejects_axis_query() {
        let cylinder =
            Cylinder::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x()).unwrap();
        let carrier = SurfaceCarrier::new(cylinder);
        assert!(carrier.closest_point(&p(0.0, 0.0, 0.5), 1e-6).is_err());
        let cp = carrier.closest_point(&p(2.0, 0.0, 0.5), 1e-6).unwrap();
        assert!((cp.point - p(1.0, 0.0, 0.5)).norm() < 1e-9);
    }
}
