//! Playback service interface used by the zone runtime

use crate::core::Transform;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a playing sound instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceHandle(u64);

impl InstanceHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Reference to a sound asset or event, resolved by the playback service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundRef(String);

impl SoundRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SoundRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SoundRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Errors reported by a playback service
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AudioError {
    #[error("Unknown sound: {0}")]
    UnknownSound(String),

    #[error("Failed to start {sound}: {reason}")]
    StartFailed { sound: String, reason: String },
}

/// Audio engine operations the zone runtime drives
pub trait AudioPlayback {
    /// Start an instance of `sound` at `transform`
    fn start(
        &mut self,
        sound: &SoundRef,
        transform: Transform,
        looping: bool,
    ) -> Result<InstanceHandle, AudioError>;

    /// Stop an instance; it stays valid until released
    fn stop(&mut self, instance: InstanceHandle, allow_fade_out: bool);

    /// Free an instance. The handle is invalid afterwards.
    fn release(&mut self, instance: InstanceHandle);

    fn is_valid(&self, instance: InstanceHandle) -> bool;

    fn set_parameter(&mut self, instance: InstanceHandle, name: &str, value: f32);

    fn set_position(&mut self, instance: InstanceHandle, position: Vec3);

    fn set_orientation(&mut self, instance: InstanceHandle, rotation: Quat);

    /// Stop with fade-out and release, if the handle is still valid
    fn stop_and_release(&mut self, instance: InstanceHandle) {
        if self.is_valid(instance) {
            self.stop(instance, true);
            self.release(instance);
        }
    }
}
