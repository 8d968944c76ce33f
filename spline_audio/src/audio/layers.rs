//! Reverb and mix layers that play while the listener is inside a zone

use crate::audio::playback::{AudioPlayback, InstanceHandle, SoundRef};
use crate::core::Transform;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct Layer {
    name: &'static str,
    sound: Option<SoundRef>,
    instance: Option<InstanceHandle>,
}

impl Layer {
    fn start<P: AudioPlayback + ?Sized>(&mut self, playback: &mut P) {
        let Some(sound) = &self.sound else {
            return;
        };
        if self.instance.is_some() {
            return;
        }

        // Layers are non-positional, the transform is left at the origin
        match playback.start(sound, Transform::default(), true) {
            Ok(instance) => {
                debug!(layer = self.name, sound = %sound, "Started ambience layer");
                self.instance = Some(instance);
            }
            Err(e) => warn!(layer = self.name, sound = %sound, "Failed to start ambience layer: {}", e),
        }
    }

    fn stop<P: AudioPlayback + ?Sized>(&mut self, playback: &mut P) {
        if let Some(instance) = self.instance.take() {
            debug!(layer = self.name, "Stopped ambience layer");
            playback.stop_and_release(instance);
        }
    }
}

/// The reverb and mix layers of a zone
#[derive(Debug, Clone)]
pub struct AmbienceLayers {
    reverb: Layer,
    mix: Layer,
}

impl AmbienceLayers {
    pub fn new(reverb: Option<SoundRef>, mix: Option<SoundRef>) -> Self {
        Self {
            reverb: Layer {
                name: "reverb",
                sound: reverb,
                instance: None,
            },
            mix: Layer {
                name: "mix",
                sound: mix,
                instance: None,
            },
        }
    }

    /// Start every configured layer that is not already playing
    pub fn activate<P: AudioPlayback + ?Sized>(&mut self, playback: &mut P) {
        self.reverb.start(playback);
        self.mix.start(playback);
    }

    /// Stop with fade-out and release both layers
    pub fn deactivate<P: AudioPlayback + ?Sized>(&mut self, playback: &mut P) {
        self.reverb.stop(playback);
        self.mix.stop(playback);
    }

    pub fn is_active(&self) -> bool {
        self.reverb.instance.is_some() || self.mix.instance.is_some()
    }

    pub fn reverb_instance(&self) -> Option<InstanceHandle> {
        self.reverb.instance
    }

    pub fn mix_instance(&self) -> Option<InstanceHandle> {
        self.mix.instance
    }
}
