//! Openings (portals) along a zone boundary
//!
//! An opening is a window of arc length centered on a control point. When the
//! listener is outside the zone, the emitter is pulled to the closest point of
//! the closest opening instead of the closest point of the whole boundary.

use crate::curve::BoundaryCurve;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A window on the boundary through which sound leaks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opening {
    /// Control point the window is centered on
    pub anchor_index: usize,
    /// Window width in arc length
    pub width: f32,
    /// Runtime open/closed state
    pub open: bool,
}

impl Default for Opening {
    fn default() -> Self {
        Self {
            anchor_index: 0,
            width: 100.0,
            open: true,
        }
    }
}

impl Opening {
    pub fn new(anchor_index: usize, width: f32) -> Self {
        Self {
            anchor_index,
            width,
            open: true,
        }
    }

    pub fn center_arc_length(&self, curve: &dyn BoundaryCurve) -> f32 {
        curve.arc_length_at_control_point(self.anchor_index)
    }

    /// Window start, wrapped by the curve length when it would be negative
    pub fn start_arc_length(&self, curve: &dyn BoundaryCurve) -> f32 {
        let start = self.center_arc_length(curve) - self.width / 2.0;
        if start < 0.0 {
            start + curve.total_length()
        } else {
            start
        }
    }

    /// Window end. Not wrapped; the curve wraps it when sampling a closed loop.
    pub fn end_arc_length(&self, curve: &dyn BoundaryCurve) -> f32 {
        self.center_arc_length(curve) + self.width / 2.0
    }

    /// Closest point of this opening's window to `point`.
    ///
    /// `point` is expected to lie on the curve already. When its arc length
    /// falls inside the window it is returned unchanged, otherwise the nearer
    /// window edge in arc-length order is returned.
    ///
    /// A window that wraps past the start of a closed loop (`start > end`) is
    /// compared as a plain interval, so points just after the loop start are
    /// clamped to `start` rather than kept.
    pub fn closest_point(&self, point: Vec3, curve: &dyn BoundaryCurve) -> Vec3 {
        let distance = curve.arc_length_at_nearest(point);
        let start = self.start_arc_length(curve);
        let end = self.end_arc_length(curve);

        if distance >= start && distance <= end {
            point
        } else if distance < start {
            curve.point_at_arc_length(start)
        } else {
            curve.point_at_arc_length(end)
        }
    }
}

/// The opening chosen for the emitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOpening {
    /// Position of the opening in configuration order
    pub index: usize,
    /// Closest window point
    pub point: Vec3,
    /// Distance from the query to `point`
    pub distance: f32,
    pub open: bool,
}

/// Find the opening whose window comes closest to `point`.
///
/// Ties go to the opening listed first. Returns `None` when there are no
/// openings.
pub fn resolve_nearest_opening(
    openings: &[Opening],
    point: Vec3,
    curve: &dyn BoundaryCurve,
) -> Option<ResolvedOpening> {
    let mut best: Option<ResolvedOpening> = None;

    for (index, opening) in openings.iter().enumerate() {
        let candidate = opening.closest_point(point, curve);
        let distance = candidate.distance(point);
        if best.map_or(true, |current| distance < current.distance) {
            best = Some(ResolvedOpening {
                index,
                point: candidate,
                distance,
                open: opening.open,
            });
        }
    }

    best
}
