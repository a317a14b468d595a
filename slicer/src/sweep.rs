use common::plane::Plane;

use crate::{error::SweepError, mesh::Mesh};

/// Sweeps with more offsets than this are refused.
const MAX_OFFSETS: f64 = 10_000_000.0;

/// The offsets a plane is sliced at: `start + i * step` for `i` in
/// `0..count`. Both ends of the range are included whenever the range is a
/// whole number of steps long.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    start: f32,
    step: f32,
    count: usize,
}

impl Sweep {
    pub fn new(min: f32, max: f32, step: f32) -> Result<Self, SweepError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(SweepError::InvalidStep(step));
        }

        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(SweepError::InvalidRange { min, max });
        }

        let (start, end, step_f64) = (min as f64, max as f64, step as f64);
        let steps = (end - start) / step_f64;

        // The bounds only carry f32 precision, so a range that should be a
        // whole number of steps can come out a few ulps short.
        let slack = 4.0 * f32::EPSILON as f64 * (start.abs().max(end.abs()) + step_f64) / step_f64;
        let count = (steps + slack).floor() + 1.0;

        if count > MAX_OFFSETS {
            return Err(SweepError::TooManyOffsets { count });
        }

        Ok(Self {
            start: min,
            step,
            count: count as usize,
        })
    }

    /// Sweep over the extent of the mesh bounding box along the plane's
    /// normal axis.
    pub fn for_plane(mesh: &Mesh, plane: Plane, step: f32) -> Result<Self, SweepError> {
        let (min, max) = mesh.bounds();
        let axis = plane.axis();
        Self::new(min[axis], max[axis], step)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    /// Offset of the `i`th slice. Computed from the index rather than by
    /// accumulating steps so long sweeps do not drift.
    pub fn offset(&self, i: usize) -> f32 {
        (self.start as f64 + i as f64 * self.step as f64) as f32
    }

    pub fn offsets(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.count).map(|i| self.offset(i))
    }
}
