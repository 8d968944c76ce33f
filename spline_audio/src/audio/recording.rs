//! In-memory playback service that records every call
//!
//! Stands in for a real audio engine in tests and in the demo binary.

use crate::audio::playback::{AudioError, AudioPlayback, InstanceHandle, SoundRef};
use crate::core::Transform;
use glam::{Quat, Vec3};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A call made against the playback service
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCall {
    Start {
        instance: InstanceHandle,
        sound: SoundRef,
        position: Vec3,
        looping: bool,
    },
    Stop {
        instance: InstanceHandle,
        allow_fade_out: bool,
    },
    Release {
        instance: InstanceHandle,
    },
    SetParameter {
        instance: InstanceHandle,
        name: String,
        value: f32,
    },
    SetPosition {
        instance: InstanceHandle,
        position: Vec3,
    },
    SetOrientation {
        instance: InstanceHandle,
        rotation: Quat,
    },
}

/// State of an instance that has not been released
#[derive(Debug, Clone)]
pub struct RecordedInstance {
    pub sound: SoundRef,
    pub transform: Transform,
    pub looping: bool,
    pub stopped: bool,
    pub parameters: HashMap<String, f32>,
}

/// Playback service that keeps instances in memory
#[derive(Debug, Default)]
pub struct RecordingPlayback {
    instances: HashMap<InstanceHandle, RecordedInstance>,
    calls: Vec<PlaybackCall>,
    missing: HashSet<SoundRef>,
    next_id: u64,
}

impl RecordingPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future `start` of `sound` fail
    pub fn mark_missing(&mut self, sound: impl Into<SoundRef>) {
        self.missing.insert(sound.into());
    }

    pub fn calls(&self) -> &[PlaybackCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn instance(&self, instance: InstanceHandle) -> Option<&RecordedInstance> {
        self.instances.get(&instance)
    }

    /// Instances started and not yet released
    pub fn live_count(&self) -> usize {
        self.instances.len()
    }

    /// Live instances of `sound` that have not been stopped
    pub fn playing(&self, sound: &SoundRef) -> Vec<InstanceHandle> {
        let mut handles: Vec<_> = self
            .instances
            .iter()
            .filter(|(_, recorded)| !recorded.stopped && &recorded.sound == sound)
            .map(|(handle, _)| *handle)
            .collect();
        handles.sort_by_key(|handle| handle.id());
        handles
    }

    /// Number of `start` calls made for `sound`
    pub fn start_count(&self, sound: &SoundRef) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, PlaybackCall::Start { sound: s, .. } if s == sound))
            .count()
    }
}

impl AudioPlayback for RecordingPlayback {
    fn start(
        &mut self,
        sound: &SoundRef,
        transform: Transform,
        looping: bool,
    ) -> Result<InstanceHandle, AudioError> {
        if self.missing.contains(sound) {
            return Err(AudioError::UnknownSound(sound.to_string()));
        }

        let instance = InstanceHandle::new(self.next_id);
        self.next_id += 1;

        debug!(sound = %sound, id = instance.id(), position = ?transform.position, "Playing sound");
        self.instances.insert(
            instance,
            RecordedInstance {
                sound: sound.clone(),
                transform,
                looping,
                stopped: false,
                parameters: HashMap::new(),
            },
        );
        self.calls.push(PlaybackCall::Start {
            instance,
            sound: sound.clone(),
            position: transform.position,
            looping,
        });
        Ok(instance)
    }

    fn stop(&mut self, instance: InstanceHandle, allow_fade_out: bool) {
        if let Some(recorded) = self.instances.get_mut(&instance) {
            recorded.stopped = true;
        }
        self.calls.push(PlaybackCall::Stop {
            instance,
            allow_fade_out,
        });
    }

    fn release(&mut self, instance: InstanceHandle) {
        self.instances.remove(&instance);
        self.calls.push(PlaybackCall::Release { instance });
    }

    fn is_valid(&self, instance: InstanceHandle) -> bool {
        self.instances.contains_key(&instance)
    }

    fn set_parameter(&mut self, instance: InstanceHandle, name: &str, value: f32) {
        if let Some(recorded) = self.instances.get_mut(&instance) {
            recorded.parameters.insert(name.to_string(), value);
        }
        self.calls.push(PlaybackCall::SetParameter {
            instance,
            name: name.to_string(),
            value,
        });
    }

    fn set_position(&mut self, instance: InstanceHandle, position: Vec3) {
        if let Some(recorded) = self.instances.get_mut(&instance) {
            recorded.transform.position = position;
        }
        self.calls.push(PlaybackCall::SetPosition { instance, position });
    }

    fn set_orientation(&mut self, instance: InstanceHandle, rotation: Quat) {
        if let Some(recorded) = self.instances.get_mut(&instance) {
            recorded.transform.rotation = rotation;
        }
        self.calls.push(PlaybackCall::SetOrientation { instance, rotation });
    }
}
