pub mod carrier;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod math;
pub mod network;
pub mod operations;
pub mod params;
pub mod pipeline;
pub mod plank;

#[cfg(test)]
mod test_support;

pub use error::{PlankError, Result};
pub use network::{AxisAddress, PlankAddress};
pub use pipeline::{NetworkReport, PlankNetworkBuilder};
