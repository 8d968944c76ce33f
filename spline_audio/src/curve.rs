//! Boundary curve abstraction and a straight-segment reference curve
//!
//! The zone runtime never interpolates splines itself. It talks to the
//! boundary through [`BoundaryCurve`], which a host backs with whatever curve
//! representation it already has. [`PolylineCurve`] joins control points with
//! straight segments and is what tests and the demo use.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Queries the zone runtime needs from the curve that outlines a zone
pub trait BoundaryCurve {
    /// Closest world-space point on the curve to `world_pos`
    fn nearest_point(&self, world_pos: Vec3) -> Vec3;

    /// Distance along the curve of the point closest to `world_pos`
    fn arc_length_at_nearest(&self, world_pos: Vec3) -> f32;

    /// Distance along the curve at a control point
    fn arc_length_at_control_point(&self, index: usize) -> f32;

    /// World-space point at a distance along the curve
    fn point_at_arc_length(&self, distance: f32) -> Vec3;

    /// Full length of the curve, including the closing segment of a loop
    fn total_length(&self) -> f32;

    /// Whether the last control point connects back to the first
    fn is_closed_loop(&self) -> bool;

    fn control_point_count(&self) -> usize;

    fn control_point_at(&self, index: usize) -> Vec3;

    /// All control points in curve order
    fn control_points(&self) -> Vec<Vec3> {
        (0..self.control_point_count())
            .map(|i| self.control_point_at(i))
            .collect()
    }
}

/// Curve made of straight segments between control points
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PolylineData", into = "PolylineData")]
pub struct PolylineCurve {
    points: Vec<Vec3>,
    closed: bool,
    /// Arc length at each control point
    cumulative: Vec<f32>,
    total: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PolylineData {
    points: Vec<Vec3>,
    #[serde(default = "default_closed")]
    closed_loop: bool,
}

fn default_closed() -> bool {
    true
}

impl From<PolylineData> for PolylineCurve {
    fn from(data: PolylineData) -> Self {
        Self::new(data.points, data.closed_loop)
    }
}

impl From<PolylineCurve> for PolylineData {
    fn from(curve: PolylineCurve) -> Self {
        Self {
            points: curve.points,
            closed_loop: curve.closed,
        }
    }
}

impl PolylineCurve {
    /// Create a curve through `points`, closing it back to the first point if `closed`
    pub fn new(points: Vec<Vec3>, closed: bool) -> Self {
        let mut curve = Self {
            points,
            closed,
            cumulative: Vec::new(),
            total: 0.0,
        };
        curve.rebuild_lengths();
        curve
    }

    /// Replace the control points and recompute arc lengths
    pub fn set_points(&mut self, points: Vec<Vec3>) {
        self.points = points;
        self.rebuild_lengths();
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    fn rebuild_lengths(&mut self) {
        self.cumulative.clear();
        let mut running = 0.0;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                running += point.distance(self.points[i - 1]);
            }
            self.cumulative.push(running);
        }
        if self.closed && self.points.len() > 1 {
            running += self.points[self.points.len() - 1].distance(self.points[0]);
        }
        self.total = running;
    }

    fn segment_count(&self) -> usize {
        let n = self.points.len();
        if self.closed && n > 1 {
            n
        } else {
            n.saturating_sub(1)
        }
    }

    fn segment(&self, index: usize) -> (Vec3, Vec3) {
        let a = self.points[index];
        let b = self.points[(index + 1) % self.points.len()];
        (a, b)
    }

    /// Closest point on the curve and its arc length. First segment wins ties.
    fn closest(&self, world_pos: Vec3) -> Option<(Vec3, f32)> {
        match self.points.len() {
            0 => return None,
            1 => return Some((self.points[0], 0.0)),
            _ => {}
        }

        let mut best: Option<(Vec3, f32, f32)> = None;
        for i in 0..self.segment_count() {
            let (a, b) = self.segment(i);
            let ab = b - a;
            let len_sq = ab.length_squared();
            let t = if len_sq > f32::EPSILON {
                ((world_pos - a).dot(ab) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let candidate = a + ab * t;
            let dist_sq = candidate.distance_squared(world_pos);
            if best.map_or(true, |(_, _, best_sq)| dist_sq < best_sq) {
                let arc = self.cumulative[i] + len_sq.sqrt() * t;
                best = Some((candidate, arc, dist_sq));
            }
        }
        best.map(|(point, arc, _)| (point, arc))
    }
}

impl BoundaryCurve for PolylineCurve {
    fn nearest_point(&self, world_pos: Vec3) -> Vec3 {
        self.closest(world_pos)
            .map(|(point, _)| point)
            .unwrap_or(Vec3::ZERO)
    }

    fn arc_length_at_nearest(&self, world_pos: Vec3) -> f32 {
        self.closest(world_pos).map(|(_, arc)| arc).unwrap_or(0.0)
    }

    fn arc_length_at_control_point(&self, index: usize) -> f32 {
        match self.cumulative.get(index) {
            Some(arc) => *arc,
            None => self.cumulative.last().copied().unwrap_or(0.0),
        }
    }

    fn point_at_arc_length(&self, distance: f32) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::ZERO;
        }
        if self.total <= f32::EPSILON {
            return self.points[0];
        }

        let distance = if self.closed {
            distance.rem_euclid(self.total)
        } else {
            distance.clamp(0.0, self.total)
        };

        for i in 0..self.segment_count() {
            let (a, b) = self.segment(i);
            let start = self.cumulative[i];
            let len = a.distance(b);
            if distance <= start + len {
                let t = if len > f32::EPSILON {
                    (distance - start) / len
                } else {
                    0.0
                };
                return a.lerp(b, t);
            }
        }

        // Float drift past the last segment end
        let (_, end) = self.segment(self.segment_count() - 1);
        end
    }

    fn total_length(&self) -> f32 {
        self.total
    }

    fn is_closed_loop(&self) -> bool {
        self.closed
    }

    fn control_point_count(&self) -> usize {
        self.points.len()
    }

    fn control_point_at(&self, index: usize) -> Vec3 {
        self.points.get(index).copied().unwrap_or(Vec3::ZERO)
    }

    fn control_points(&self) -> Vec<Vec3> {
        self.points.clone()
    }
}
