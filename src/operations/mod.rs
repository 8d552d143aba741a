pub mod fabricate;
pub mod intersect;
pub mod stack;
pub mod sweep;

pub use fabricate::{CutLine, FabricationLayout, FabricationProjector};
pub use intersect::{NetworkIntersector, ScaledCutter};
pub use stack::PlankStack;
pub use sweep::{FrameSample, FrameSweep, Ribbon};
