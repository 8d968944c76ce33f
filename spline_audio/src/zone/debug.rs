//! Zone debug visualization
//!
//! Converts zone state into plain debug primitives. Nothing here renders; a
//! host feeds the shapes to whatever line/sphere drawer it has.

use crate::config::DebugSettings;
use crate::curve::BoundaryCurve;
use crate::zone::geometry::BoundingCylinder;
use crate::zone::opening::Opening;
use glam::{Vec3, Vec4};
use std::time::Duration;
use tracing::trace;

/// How long a respawn marker stays visible
pub const PLACEMENT_MARKER_LIFETIME: Duration = Duration::from_secs(3);

/// Upper bound on line segments drawn per opening
pub const MAX_OPENING_SEGMENTS: usize = 256;

const BOUNDS_COLOR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0); // Red
const OPENING_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0); // Yellow
const EMITTER_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0); // White
const PLACEMENT_COLOR: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0); // Green

/// A primitive to draw
#[derive(Debug, Clone, PartialEq)]
pub enum DebugShape {
    Cylinder {
        center: Vec3,
        radius: f32,
        height: f32,
        color: Vec4,
    },
    Sphere {
        center: Vec3,
        radius: f32,
        color: Vec4,
    },
    Line {
        start: Vec3,
        end: Vec3,
        color: Vec4,
    },
    Point {
        position: Vec3,
        size: f32,
        color: Vec4,
    },
}

/// Marker left where an ambient sound respawned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementMarker {
    pub position: Vec3,
    pub remaining: Duration,
}

impl PlacementMarker {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            remaining: PLACEMENT_MARKER_LIFETIME,
        }
    }
}

/// Age markers by `elapsed` and drop the expired ones
pub fn age_markers(markers: &mut Vec<PlacementMarker>, elapsed: Duration) {
    markers.retain_mut(|marker| {
        marker.remaining = marker.remaining.saturating_sub(elapsed);
        !marker.remaining.is_zero()
    });
}

/// Split an opening window into line segments of roughly `precision` length,
/// at most [`MAX_OPENING_SEGMENTS`] of them
pub fn opening_segments(
    opening: &Opening,
    curve: &dyn BoundaryCurve,
    precision: f32,
) -> Vec<(Vec3, Vec3)> {
    if !(precision > 0.0) {
        return Vec::new();
    }

    let start = opening.start_arc_length(curve);
    let end = opening.end_arc_length(curve);
    let count = ((opening.width / precision) as usize).min(MAX_OPENING_SEGMENTS);

    (0..count)
        .map(|j| {
            let from = curve.point_at_arc_length(start + opening.width * j as f32 / count as f32);
            let to = if j + 1 < count {
                curve.point_at_arc_length(start + opening.width * (j + 1) as f32 / count as f32)
            } else {
                curve.point_at_arc_length(end)
            };
            (from, to)
        })
        .collect()
}

/// Everything the debug pass needs to read
pub struct DebugScene<'a> {
    pub settings: &'a DebugSettings,
    pub curve: &'a dyn BoundaryCurve,
    pub bounds: &'a BoundingCylinder,
    pub openings: &'a [Opening],
    pub max_distance: f32,
    pub emitter: Vec3,
    pub markers: &'a [PlacementMarker],
}

/// Collect debug shapes for a zone. Empty when debug is off.
pub fn collect_debug_shapes(scene: &DebugScene<'_>) -> Vec<DebugShape> {
    if !scene.settings.show_debug {
        return Vec::new();
    }

    trace!("Collecting zone debug shapes");

    let mut shapes = vec![
        DebugShape::Cylinder {
            center: scene.bounds.center,
            radius: scene.bounds.radius,
            height: scene.bounds.height,
            color: BOUNDS_COLOR,
        },
        DebugShape::Sphere {
            center: scene.bounds.center,
            radius: scene.max_distance,
            color: BOUNDS_COLOR,
        },
    ];

    for opening in scene.openings {
        for (start, end) in
            opening_segments(opening, scene.curve, scene.settings.opening_debug_precision)
        {
            shapes.push(DebugShape::Line {
                start,
                end,
                color: OPENING_COLOR,
            });
        }
        shapes.push(DebugShape::Point {
            position: scene
                .curve
                .point_at_arc_length(opening.center_arc_length(scene.curve)),
            size: 30.0,
            color: BOUNDS_COLOR,
        });
    }

    shapes.push(DebugShape::Sphere {
        center: scene.emitter,
        radius: 100.0,
        color: EMITTER_COLOR,
    });

    for marker in scene.markers {
        shapes.push(DebugShape::Sphere {
            center: marker.position,
            radius: 100.0,
            color: PLACEMENT_COLOR,
        });
    }

    shapes
}
