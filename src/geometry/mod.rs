pub mod polyline;
pub mod slab;
pub mod strip;
pub mod surface;

pub use polyline::Polyline;
pub use slab::SlabSolid;
pub use strip::{AreaProperties, StripBrep, StripFace};
pub use surface::{Cylinder, Plane, Sphere, Surface, SurfacePoint};
