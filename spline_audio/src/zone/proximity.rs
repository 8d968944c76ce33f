//! Distance gating and containment state for the listener

use glam::Vec3;
use tracing::debug;

/// Whether the listener is close enough for the zone to do any work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Proximity {
    /// Beyond the activation distance; the tick exits early
    #[default]
    Far,
    /// Within the activation distance
    Near,
}

/// Whether the listener is inside the zone boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Containment {
    Inside,
    #[default]
    Outside,
}

/// Edge produced when containment changes between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainmentTransition {
    Entered,
    Exited,
}

impl Containment {
    /// Transition from `self` to `next`, if any
    pub fn transition_to(self, next: Containment) -> Option<ContainmentTransition> {
        match (self, next) {
            (Containment::Outside, Containment::Inside) => Some(ContainmentTransition::Entered),
            (Containment::Inside, Containment::Outside) => Some(ContainmentTransition::Exited),
            _ => None,
        }
    }
}

/// Tracks `Far`/`Near` from the listener's distance to the zone center
#[derive(Debug, Clone)]
pub struct ProximityGate {
    max_distance: f32,
    state: Proximity,
}

impl ProximityGate {
    pub fn new(max_distance: f32) -> Self {
        Self {
            max_distance,
            state: Proximity::Far,
        }
    }

    /// Classify a listener position without changing the gate
    pub fn classify(&self, listener: Vec3, center: Vec3) -> Proximity {
        if listener.distance(center) > self.max_distance {
            Proximity::Far
        } else {
            Proximity::Near
        }
    }

    /// Update the gate from this tick's listener position
    pub fn evaluate(&mut self, listener: Vec3, center: Vec3) -> Proximity {
        let next = self.classify(listener, center);
        if next != self.state {
            debug!(
                from = ?self.state,
                to = ?next,
                distance = listener.distance(center),
                max_distance = self.max_distance,
                "Listener proximity changed"
            );
            self.state = next;
        }
        next
    }

    pub fn state(&self) -> Proximity {
        self.state
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }
}
