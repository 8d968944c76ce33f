//! Spline-bounded audio zones
//!
//! A zone is a closed boundary curve, optionally perforated by openings, with
//! a looping emitter that follows the listener inside and clings to the
//! boundary (or the nearest opening) outside. The zone also layers reverb/mix
//! ambience while the listener is inside and scatters random one-shots around
//! the area.

pub mod debug;
pub mod geometry;
pub mod opening;
pub mod positioner;
pub mod proximity;
pub mod sampler;
pub mod system;

#[cfg(test)]
mod tests;

pub use debug::DebugShape;
pub use geometry::{compute_bounds, is_inside_shape, BoundaryShape, BoundingCylinder};
pub use opening::{resolve_nearest_opening, Opening, ResolvedOpening};
pub use positioner::{EmitterPositioner, EmitterUpdate};
pub use proximity::{Containment, ContainmentTransition, Proximity, ProximityGate};
pub use sampler::{Placement, PlacementSampler, MAX_PLACEMENT_ATTEMPTS};
pub use system::{SplineAudioZone, ZoneError, PORTAL_OPEN_PARAMETER};
