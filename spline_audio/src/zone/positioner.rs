//! Placement of the zone's primary emitter relative to the listener

use crate::core::Transform;
use crate::curve::BoundaryCurve;
use crate::zone::geometry::BoundaryShape;
use crate::zone::opening::{resolve_nearest_opening, Opening, ResolvedOpening};
use crate::zone::proximity::{Containment, ContainmentTransition};
use glam::{Quat, Vec3};
use tracing::trace;

/// Where the emitter goes this tick and what changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterUpdate {
    pub position: Vec3,
    /// Listener rotation, only set while the listener is inside
    pub orientation: Option<Quat>,
    pub containment: Containment,
    pub transition: Option<ContainmentTransition>,
    /// Opening the emitter snapped to, if any are configured
    pub opening: Option<ResolvedOpening>,
}

/// Computes emitter placement from a boundary and its openings
pub struct EmitterPositioner<'a> {
    pub curve: &'a dyn BoundaryCurve,
    pub shape: &'a BoundaryShape,
    pub openings: &'a [Opening],
}

impl EmitterPositioner<'_> {
    /// Place the emitter for a listener pose.
    ///
    /// Inside a closed boundary (and inside its bounding cylinder) the emitter
    /// follows the listener. Outside, it sits on the boundary point closest to
    /// the listener, or on the closest point of the closest opening when
    /// openings exist.
    pub fn update(&self, listener: &Transform, previous: Containment) -> EmitterUpdate {
        let position = listener.position;
        let nearest_on_curve = self.curve.nearest_point(position);
        let in_volume = self.shape.bounds().contains(position);

        let inside = self.shape.contains(position) && self.curve.is_closed_loop() && in_volume;

        if inside {
            trace!(position = ?position, "Emitter follows listener inside zone");
            return EmitterUpdate {
                position,
                orientation: Some(listener.rotation),
                containment: Containment::Inside,
                transition: previous.transition_to(Containment::Inside),
                opening: None,
            };
        }

        let opening = resolve_nearest_opening(self.openings, nearest_on_curve, self.curve);
        let emitter = opening.map_or(nearest_on_curve, |resolved| resolved.point);
        trace!(
            position = ?emitter,
            opening = ?opening.map(|resolved| resolved.index),
            "Emitter placed on boundary"
        );

        EmitterUpdate {
            position: emitter,
            orientation: None,
            containment: Containment::Outside,
            transition: previous.transition_to(Containment::Outside),
            opening,
        }
    }
}
