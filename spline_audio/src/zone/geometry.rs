//! Bounding volume and containment tests for a zone boundary
//!
//! Containment is decided in the horizontal plane: control points and the
//! query are flattened onto XY and run through a crossing-number test. The
//! boundary is assumed to be a simple polygon once flattened; self-intersecting
//! outlines give whatever the parity rule yields.

use crate::curve::BoundaryCurve;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sphere-in-plane bound extruded to a fixed height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingCylinder {
    /// Mean of all control points
    pub center: Vec3,
    /// Largest distance from the center to a control point
    pub radius: f32,
    /// Full vertical extent, centered on `center.z`
    pub height: f32,
}

impl BoundingCylinder {
    /// Horizontal distance from the axis to `point`
    pub fn horizontal_distance(&self, point: Vec3) -> f32 {
        point.truncate().distance(self.center.truncate())
    }

    /// Vertical distance from the center plane to `point`
    pub fn vertical_distance(&self, point: Vec3) -> f32 {
        (point.z - self.center.z).abs()
    }

    /// Strictly inside the cylinder both horizontally and vertically
    pub fn contains(&self, point: Vec3) -> bool {
        self.horizontal_distance(point) < self.radius
            && self.vertical_distance(point) < self.height / 2.0
    }

    /// Lower and upper corners of the box that encloses the cylinder
    pub fn box_extents(&self) -> (Vec3, Vec3) {
        let half = Vec3::new(self.radius, self.radius, self.height / 2.0);
        (self.center - half, self.center + half)
    }
}

/// Compute the enclosing sphere of a set of points.
///
/// Returns `(radius, center)`: the center is the arithmetic mean and the radius
/// the largest distance from it. An empty set yields a zero radius at the origin.
pub fn compute_bounds(points: &[Vec3]) -> (f32, Vec3) {
    if points.is_empty() {
        return (0.0, Vec3::ZERO);
    }

    let center = points.iter().copied().sum::<Vec3>() / points.len() as f32;
    let radius = points
        .iter()
        .map(|point| point.distance(center))
        .fold(0.0_f32, f32::max);

    (radius, center)
}

/// Crossing-number point-in-polygon test on the XY projection
pub fn is_inside_shape(point: Vec3, points: &[Vec3]) -> bool {
    let query = point.truncate();
    let count = points.len();
    let mut crossings = 0usize;

    for i in 0..count {
        let mut a: Vec2 = points[i].truncate();
        let mut b: Vec2 = points[(i + 1) % count].truncate();
        if a.y > b.y {
            std::mem::swap(&mut a, &mut b);
        }

        if a.y <= query.y && query.y < b.y {
            let t = (query.y - a.y) / (b.y - a.y);
            if query.x < a.x + t * (b.x - a.x) {
                crossings += 1;
            }
        }
    }

    crossings % 2 == 1
}

/// Cached boundary outline and its bounding cylinder
#[derive(Debug, Clone)]
pub struct BoundaryShape {
    control_points: Vec<Vec3>,
    bounds: BoundingCylinder,
}

impl BoundaryShape {
    /// Build a shape from control points and a cylinder height
    pub fn new(control_points: Vec<Vec3>, height: f32) -> Self {
        let (radius, center) = compute_bounds(&control_points);
        debug!(
            points = control_points.len(),
            radius = radius,
            center = ?center,
            height = height,
            "Computed boundary bounds"
        );
        Self {
            control_points,
            bounds: BoundingCylinder {
                center,
                radius,
                height,
            },
        }
    }

    /// Snapshot the control points of a curve
    pub fn from_curve(curve: &dyn BoundaryCurve, height: f32) -> Self {
        Self::new(curve.control_points(), height)
    }

    /// Replace the outline, recomputing the bounds
    pub fn set_control_points(&mut self, control_points: Vec<Vec3>) {
        *self = Self::new(control_points, self.bounds.height);
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.control_points
    }

    pub fn bounds(&self) -> &BoundingCylinder {
        &self.bounds
    }

    pub fn contains(&self, point: Vec3) -> bool {
        is_inside_shape(point, &self.control_points)
    }
}
