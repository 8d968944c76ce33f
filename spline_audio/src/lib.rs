//! Spline audio zones
//!
//! This crate places a positional audio emitter relative to a moving listener
//! and a closed boundary curve, layers reverb and mix ambience while the
//! listener is inside, and scatters random ambient one-shots around the area.
//! Audio engines, curves and timers are reached through traits so the runtime
//! can be embedded in any host.

pub mod audio;
pub mod config;
pub mod core;
pub mod curve;
pub mod timer;
pub mod zone;

// Re-export commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{Transform, UP};

    // Math types
    pub use glam::{Quat, Vec2, Vec3, Vec4};

    // Curve types
    pub use crate::curve::{BoundaryCurve, PolylineCurve};

    // Audio types
    pub use crate::audio::{
        AmbientSoundConfig, AudioError, AudioListener, AudioPlayback, DelayRange, InstanceHandle,
        ListenerPoseSource, RecordingPlayback, SoundRef,
    };

    // Timer types
    pub use crate::timer::{Scheduler, TimerHandle, TimerQueue};

    // Config types
    pub use crate::config::{ConfigError, DebugSettings, ZoneConfig};

    // Zone types
    pub use crate::zone::{
        Containment, DebugShape, Opening, Proximity, SplineAudioZone, ZoneError,
    };
}

/// Initialize logging for the zone runtime
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
