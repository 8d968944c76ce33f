//! Audio listener state and pose sources

use crate::core::Transform;
use crate::zone::proximity::Containment;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Listener position and rotation
pub type ListenerPose = Transform;

/// Something that can report where the listener is this tick
pub trait ListenerPoseSource {
    /// Current listener pose, or `None` when no listener is available
    fn current_pose(&self) -> Option<ListenerPose>;
}

impl ListenerPoseSource for Transform {
    fn current_pose(&self) -> Option<Transform> {
        Some(*self)
    }
}

impl ListenerPoseSource for Option<Transform> {
    fn current_pose(&self) -> Option<Transform> {
        *self
    }
}

impl ListenerPoseSource for hecs::World {
    fn current_pose(&self) -> Option<Transform> {
        find_active_listener(self)
    }
}

/// Audio listener component (typically attached to the camera entity)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioListener {
    /// Whether this listener is active
    pub active: bool,
}

impl Default for AudioListener {
    fn default() -> Self {
        Self { active: true }
    }
}

/// Find the pose of the first active audio listener in the world
pub fn find_active_listener(world: &hecs::World) -> Option<Transform> {
    let mut query = world.query::<(&AudioListener, &Transform)>();
    for (_entity, (listener, transform)) in query.iter() {
        if listener.active {
            return Some(*transform);
        }
    }
    None
}

/// Listener state owned by a zone runtime
#[derive(Debug, Clone, Default)]
pub struct ListenerState {
    /// Last pose received from the pose source
    pub pose: Transform,
    /// Containment computed on the last positioning pass
    pub containment: Containment,
    /// Whether any pose has been received yet
    pub has_pose: bool,
}

impl ListenerState {
    /// Store this tick's pose
    pub fn update_pose(&mut self, pose: Transform) {
        self.pose = pose;
        self.has_pose = true;
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn is_inside(&self) -> bool {
        self.containment == Containment::Inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_find_active_listener_skips_inactive() {
        let mut world = hecs::World::new();
        world.spawn((
            AudioListener { active: false },
            Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
        ));
        world.spawn((
            AudioListener::default(),
            Transform::from_position_rotation(
                Vec3::new(10.0, 5.0, 0.0),
                Quat::from_rotation_z(1.0),
            ),
        ));

        let pose = world.current_pose().expect("active listener");
        assert_eq!(pose.position, Vec3::new(10.0, 5.0, 0.0));
        assert_eq!(pose.rotation, Quat::from_rotation_z(1.0));
    }

    #[test]
    fn test_world_without_listener() {
        let mut world = hecs::World::new();
        world.spawn((Transform::default(),));
        assert!(world.current_pose().is_none());
    }

    #[test]
    fn test_listener_state_update() {
        let mut state = ListenerState::default();
        assert!(!state.has_pose);
        assert!(!state.is_inside());

        state.update_pose(Transform::from_position(Vec3::new(3.0, 4.0, 5.0)));
        assert!(state.has_pose);
        assert_eq!(state.position(), Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_optional_pose_source() {
        let none: Option<Transform> = None;
        assert!(none.current_pose().is_none());
        assert!(Transform::default().current_pose().is_some());
    }
}
