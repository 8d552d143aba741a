pub mod segment;
pub mod triangle;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Numerical tolerance for floating-point degeneracy checks.
///
/// This guards divisions and normalizations only. Geometric predicates use
/// the kernel's model tolerance instead.
pub const TOLERANCE: f64 = 1e-10;

/// Default model tolerance used by the reference kernel.
pub const DEFAULT_MODEL_TOLERANCE: f64 = 1e-6;

/// Linear interpolation between two points.
#[must_use]
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    nalgebra::center(a, b)
}

/// Normalizes a vector, failing on zero length.
///
/// # Errors
///
/// Returns [`ConstructionError::ZeroVector`](crate::error::ConstructionError::ZeroVector)
/// if the vector is shorter than [`TOLERANCE`].
pub fn unit(v: &Vector3) -> crate::Result<Vector3> {
    let len = v.norm();
    if len < TOLERANCE {
        return Err(crate::error::ConstructionError::ZeroVector.into());
    }
    Ok(v / len)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_and_middle() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 4.0, -2.0);
        assert!((lerp(&a, &b, 0.0) - a).norm() < TOLERANCE);
        assert!((lerp(&a, &b, 1.0) - b).norm() < TOLERANCE);
        assert!((lerp(&a, &b, 0.5) - midpoint(&a, &b)).norm() < TOLERANCE);
    }

    #[test]
    fn unit_rejects_zero() {
        assert!(unit(&Vector3::zeros()).is_err());
        let u = unit(&Vector3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((u.norm() - 1.0).abs() < TOLERANCE);
    }
}
