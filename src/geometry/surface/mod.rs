mod cylinder;
mod plane;
mod sphere;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use sphere::Sphere;

use crate::error::Result;
use crate::math::{Point3, Vector3};

/// Foot of a projection onto a surface, with its parameters.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoint {
    pub u: f64,
    pub v: f64,
    pub point: Point3,
    /// Distance from the projected point.
    pub distance: f64,
}

/// Analytic parametric surface that can carry a plank network.
pub trait Surface {
    /// Point at `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are outside the surface.
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3>;

    /// Unit normal at `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is degenerate.
    fn normal(&self, u: f64, v: f64) -> Result<Vector3>;

    /// Projects `query` onto the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the projection is not unique (e.g. a query on
    /// the axis of a cylinder).
    fn closest_point(&self, query: &Point3) -> Result<SurfacePoint>;
}
