//! World-space transforms for emitters and listeners

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World up axis. Horizontal tests flatten onto the XY plane.
pub const UP: Vec3 = Vec3::Z;

/// Position and rotation of an emitter or listener in world space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation in world space as a quaternion
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with the given position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Build a transform from a forward and a right axis.
    ///
    /// Forward maps to +X and right to +Y, up is derived from both. Degenerate
    /// axes fall back to the identity rotation.
    pub fn from_axes(position: Vec3, forward: Vec3, right: Vec3) -> Self {
        let forward = forward.normalize_or_zero();
        let up = forward.cross(right).normalize_or_zero();
        if forward == Vec3::ZERO || up == Vec3::ZERO {
            return Self::from_position(position);
        }
        let right = up.cross(forward);
        let rotation = Quat::from_mat3(&Mat3::from_cols(forward, right, up)).normalize();
        Self { position, rotation }
    }

    /// Forward direction (+X rotated)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Right direction (+Y rotated)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}
