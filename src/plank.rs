use std::fmt;

use crate::error::{LogicError, Result};
use crate::kernel::GeometryKernel;

/// Field values of a [`Plank`] before validation.
pub struct PlankParts<K: GeometryKernel> {
    /// Center curve before splitting.
    pub center: K::Curve,
    /// Center curve of every segment, in order along `center`.
    pub segments: Vec<K::Curve>,
    /// Mid-surface before splitting.
    pub original_surface: K::Brep,
    /// Split mid-surface; its faces line up with `segments`.
    pub surface: K::Brep,
    /// One solid per segment with cull value 0, in segment order.
    pub solids: Vec<K::Solid>,
    /// Cull value of every segment.
    pub cull_values: Vec<u32>,
    pub thickness: f64,
    pub width: f64,
    /// Length of `center`.
    pub length: f64,
    /// Frame samples per curve.
    pub refinement: usize,
    /// Position within the bundle.
    pub position: u32,
}

/// A solid strip of the network at one address.
///
/// Planks are immutable. Every stage builds new records from the previous
/// ones.
pub struct Plank<K: GeometryKernel> {
    center: K::Curve,
    segments: Vec<K::Curve>,
    original_surface: K::Brep,
    surface: K::Brep,
    solids: Vec<K::Solid>,
    cull_values: Vec<u32>,
    thickness: f64,
    width: f64,
    length: f64,
    refinement: usize,
    position: u32,
}

impl<K: GeometryKernel> Plank<K> {
    /// Validates and assembles a plank.
    ///
    /// # Errors
    ///
    /// Returns [`LogicError::Invariant`] if there are no segments, the cull
    /// values do not line up with the segments, or the solid count differs
    /// from the number of kept segments.
    pub fn new(parts: PlankParts<K>) -> Result<Self> {
        if parts.segments.is_empty() {
            return Err(LogicError::Invariant("plank has no segments".into()).into());
        }
        if parts.segments.len() != parts.cull_values.len() {
            return Err(LogicError::Invariant(format!(
                "{} segments but {} cull values",
                parts.segments.len(),
                parts.cull_values.len()
            ))
            .into());
        }
        let kept = parts.cull_values.iter().filter(|&&c| c == 0).count();
        if parts.solids.len() != kept {
            return Err(LogicError::Invariant(format!(
                "{} kept segments but {} solids",
                kept,
                parts.solids.len()
            ))
            .into());
        }
        Ok(Self {
            center: parts.center,
            segments: parts.segments,
            original_surface: parts.original_surface,
            surface: parts.surface,
            solids: parts.solids,
            cull_values: parts.cull_values,
            thickness: parts.thickness,
            width: parts.width,
            length: parts.length,
            refinement: parts.refinement,
            position: parts.position,
        })
    }

    /// Returns the center curve before splitting.
    #[must_use]
    pub fn center(&self) -> &K::Curve {
        &self.center
    }

    /// Returns the segment center curves.
    #[must_use]
    pub fn segments(&self) -> &[K::Curve] {
        &self.segments
    }

    /// Returns the mid-surface before splitting.
    #[must_use]
    pub fn original_surface(&self) -> &K::Brep {
        &self.original_surface
    }

    /// Returns the split mid-surface.
    #[must_use]
    pub fn surface(&self) -> &K::Brep {
        &self.surface
    }

    /// Returns the solids of the kept segments.
    #[must_use]
    pub fn solids(&self) -> &[K::Solid] {
        &self.solids
    }

    /// Returns the cull values.
    #[must_use]
    pub fn cull_values(&self) -> &[u32] {
        &self.cull_values
    }

    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the length of the center curve.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub fn refinement(&self) -> usize {
        self.refinement
    }

    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Kept segments with their index and solid, in order.
    pub fn surviving_segments(&self) -> impl Iterator<Item = (usize, &K::Curve, &K::Solid)> + '_ {
        self.segments
            .iter()
            .zip(&self.cull_values)
            .enumerate()
            .filter(|(_, (_, cull))| **cull == 0)
            .map(|(i, (curve, _))| (i, curve))
            .zip(&self.solids)
            .map(|((i, curve), solid)| (i, curve, solid))
    }
}

impl<K: GeometryKernel> Clone for Plank<K> {
    fn clone(&self) -> Self {
        Self {
            center: self.center.clone(),
            segments: self.segments.clone(),
            original_surface: self.original_surface.clone(),
            surface: self.surface.clone(),
            solids: self.solids.clone(),
            cull_values: self.cull_values.clone(),
            thickness: self.thickness,
            width: self.width,
            length: self.length,
            refinement: self.refinement,
            position: self.position,
        }
    }
}

impl<K: GeometryKernel> fmt::Debug for Plank<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plank")
            .field("segments", &self.segments.len())
            .field("cull_values", &self.cull_values)
            .field("solids", &self.solids.len())
            .field("thickness", &self.thickness)
            .field("width", &self.width)
            .field("length", &self.length)
            .field("refinement", &self.refinement)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
