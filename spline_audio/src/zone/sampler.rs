//! Random placement of one-shot ambient sounds inside a zone

use crate::zone::geometry::{is_inside_shape, BoundingCylinder};
use glam::Vec3;
use rand::Rng;
use tracing::{trace, warn};

/// Retries allowed after the first candidate before giving up
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 25;

/// Result of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub point: Vec3,
    /// Candidates drawn, including the returned one
    pub attempts: u32,
    /// False when the search ran out of attempts and `point` is the last
    /// rejected candidate
    pub accepted: bool,
}

/// Rejection sampler over a zone's bounding box
#[derive(Debug, Clone, Copy)]
pub struct PlacementSampler {
    /// Minimum distance between a placement and the listener
    pub min_distance: f32,
    pub max_attempts: u32,
}

impl PlacementSampler {
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }

    /// Draw points in the box around `bounds` until one lies inside `outline`
    /// and at least `min_distance` from `listener`.
    ///
    /// Once the attempt counter passes `max_attempts` the last candidate is
    /// returned as is, so callers must tolerate an occasional bad placement.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        bounds: &BoundingCylinder,
        outline: &[Vec3],
        listener: Vec3,
    ) -> Placement {
        let (low, high) = bounds.box_extents();
        let mut attempts = 0;

        loop {
            attempts += 1;
            let point = Vec3::new(
                uniform(rng, low.x, high.x),
                uniform(rng, low.y, high.y),
                uniform(rng, low.z, high.z),
            );

            let accepted = is_inside_shape(point, outline)
                && point.distance(listener) >= self.min_distance;

            if accepted {
                trace!(attempts, point = ?point, "Placement accepted");
                return Placement {
                    point,
                    attempts,
                    accepted,
                };
            }

            if attempts > self.max_attempts {
                warn!(
                    attempts,
                    point = ?point,
                    "No valid placement found, using last candidate"
                );
                return Placement {
                    point,
                    attempts,
                    accepted,
                };
            }
        }
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}
