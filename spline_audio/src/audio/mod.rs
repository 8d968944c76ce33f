//! Audio side of the zone runtime
//!
//! The zone never talks to an audio engine directly. It goes through the
//! [`AudioPlayback`] trait, which a host implements on top of its engine.
//! [`RecordingPlayback`] is an in-memory implementation used by tests and the
//! demo.

pub mod ambient;
pub mod layers;
pub mod listener;
pub mod playback;
pub mod recording;

// Re-export commonly used types
pub use ambient::{
    AmbientSoundConfig, AmbientSoundScheduler, AmbientSoundSlot, DelayRange, FireOutcome, SlotId,
    SlotState,
};
pub use layers::AmbienceLayers;
pub use listener::{
    find_active_listener, AudioListener, ListenerPose, ListenerPoseSource, ListenerState,
};
pub use playback::{AudioError, AudioPlayback, InstanceHandle, SoundRef};
pub use recording::{PlaybackCall, RecordedInstance, RecordingPlayback};
