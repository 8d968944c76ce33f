//! Configuration types for a spline audio zone

use crate::audio::ambient::AmbientSoundConfig;
use crate::audio::playback::SoundRef;
use crate::curve::PolylineCurve;
use crate::zone::opening::Opening;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Errors raised while loading or validating a zone configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid zone configuration: {0}")]
    Invalid(String),
}

/// Debug visualization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Produce debug shapes every tick
    pub show_debug: bool,
    /// Length of each line segment drawn along an opening
    pub opening_debug_precision: f32,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            show_debug: false,
            opening_debug_precision: 10.0,
        }
    }
}

/// Everything needed to build a zone runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Boundary used when the zone is built from configuration alone
    pub boundary: PolylineCurve,
    /// Looping sound carried by the primary emitter
    pub emitter_sound: Option<SoundRef>,
    /// Layer started when the listener enters the zone
    pub reverb_sound: Option<SoundRef>,
    /// Second layer started when the listener enters the zone
    pub mix_sound: Option<SoundRef>,
    /// Vertical extent of the bounding cylinder
    pub cylinder_height: f32,
    /// Listener distance from the zone center beyond which the zone idles
    pub max_distance: f32,
    pub openings: Vec<Opening>,
    pub ambient_sounds: Vec<AmbientSoundConfig>,
    /// Minimum distance between a random ambient sound and the listener
    pub min_random_sound_distance: f32,
    pub debug: DebugSettings,
    /// Seed for ambient placement and delays; entropy when absent
    pub seed: Option<u64>,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            boundary: PolylineCurve::new(Vec::new(), true),
            emitter_sound: None,
            reverb_sound: None,
            mix_sound: None,
            cylinder_height: 500.0,
            max_distance: 2000.0,
            openings: Vec::new(),
            ambient_sounds: Vec::new(),
            min_random_sound_distance: 500.0,
            debug: DebugSettings::default(),
            seed: None,
        }
    }
}

impl ZoneConfig {
    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ZoneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = ?path, "Loading zone configuration");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges. Opening anchors are checked against the boundary
    /// curve when the zone is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("cylinder_height", self.cylinder_height)?;
        non_negative("max_distance", self.max_distance)?;
        non_negative("min_random_sound_distance", self.min_random_sound_distance)?;

        for (i, opening) in self.openings.iter().enumerate() {
            if !(opening.width > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "opening {i} has non-positive width {}",
                    opening.width
                )));
            }
        }

        for (i, ambient) in self.ambient_sounds.iter().enumerate() {
            let range = ambient.delay_range;
            if !(range.min >= 0.0) || !(range.max >= range.min) {
                return Err(ConfigError::Invalid(format!(
                    "ambient sound {i} ({}) has invalid delay range {}..{}",
                    ambient.sound, range.min, range.max
                )));
            }
        }

        if !(self.debug.opening_debug_precision > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "opening_debug_precision must be positive, got {}",
                self.debug.opening_debug_precision
            )));
        }

        Ok(())
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}
