//! Zone runtime
//!
//! `SplineAudioZone` owns every piece of zone state plus the host services it
//! talks to. The host calls `begin` once, `tick` every frame and `teardown`
//! (or just drops the zone) when it goes away.

use crate::audio::ambient::{AmbientSoundScheduler, AmbientSoundSlot, FireOutcome, SlotId};
use crate::audio::layers::AmbienceLayers;
use crate::audio::listener::{ListenerPoseSource, ListenerState};
use crate::audio::playback::{AudioError, AudioPlayback, InstanceHandle};
use crate::config::{ConfigError, ZoneConfig};
use crate::core::Transform;
use crate::curve::{BoundaryCurve, PolylineCurve};
use crate::timer::Scheduler;
use crate::zone::debug::{
    age_markers, collect_debug_shapes, DebugScene, DebugShape, PlacementMarker,
};
use crate::zone::geometry::BoundaryShape;
use crate::zone::opening::Opening;
use crate::zone::positioner::{EmitterPositioner, EmitterUpdate};
use crate::zone::proximity::{Containment, ContainmentTransition, Proximity, ProximityGate};
use crate::zone::sampler::PlacementSampler;
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Audio parameter carrying the open flag of the selected opening
pub const PORTAL_OPEN_PARAMETER: &str = "Portal_IsOpen";

/// Errors raised while building or starting a zone
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Opening {opening} anchors control point {anchor} but the boundary has {count}")]
    OpeningAnchorOutOfRange {
        opening: usize,
        anchor: usize,
        count: usize,
    },
}

/// Runtime of one spline audio zone
pub struct SplineAudioZone<C: BoundaryCurve, P: AudioPlayback, S: Scheduler> {
    config: ZoneConfig,
    curve: C,
    shape: BoundaryShape,
    openings: Vec<Opening>,
    gate: ProximityGate,
    listener: ListenerState,
    emitter_instance: Option<InstanceHandle>,
    emitter_position: Vec3,
    layers: AmbienceLayers,
    ambient: AmbientSoundScheduler,
    sampler: PlacementSampler,
    markers: Vec<PlacementMarker>,
    playback: P,
    scheduler: S,
    rng: ChaCha8Rng,
    torn_down: bool,
}

impl<P: AudioPlayback, S: Scheduler> SplineAudioZone<PolylineCurve, P, S> {
    /// Build a zone whose boundary is the configuration's polyline
    pub fn from_config(config: ZoneConfig, playback: P, scheduler: S) -> Result<Self, ZoneError> {
        let curve = config.boundary.clone();
        Self::new(config, curve, playback, scheduler)
    }
}

impl<C: BoundaryCurve, P: AudioPlayback, S: Scheduler> SplineAudioZone<C, P, S> {
    pub fn new(config: ZoneConfig, curve: C, playback: P, scheduler: S) -> Result<Self, ZoneError> {
        config.validate()?;
        check_anchors(&config.openings, &curve)?;

        let shape = BoundaryShape::from_curve(&curve, config.cylinder_height);
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        info!(
            control_points = curve.control_point_count(),
            closed = curve.is_closed_loop(),
            center = ?shape.bounds().center,
            radius = shape.bounds().radius,
            openings = config.openings.len(),
            ambient_sounds = config.ambient_sounds.len(),
            "Created spline audio zone"
        );

        Ok(Self {
            openings: config.openings.clone(),
            gate: ProximityGate::new(config.max_distance),
            listener: ListenerState::default(),
            emitter_instance: None,
            emitter_position: shape.bounds().center,
            layers: AmbienceLayers::new(config.reverb_sound.clone(), config.mix_sound.clone()),
            ambient: AmbientSoundScheduler::new(&config.ambient_sounds),
            sampler: PlacementSampler::new(config.min_random_sound_distance),
            markers: Vec::new(),
            shape,
            curve,
            config,
            playback,
            scheduler,
            rng,
            torn_down: false,
        })
    }

    /// Start the primary looping emitter at the zone center
    pub fn begin(&mut self) -> Result<(), ZoneError> {
        if self.emitter_instance.is_some() {
            return Ok(());
        }
        self.torn_down = false;

        let Some(sound) = &self.config.emitter_sound else {
            info!("Zone has no emitter sound, positioning only");
            return Ok(());
        };

        let instance = self.playback.start(
            sound,
            Transform::from_position(self.emitter_position),
            true,
        )?;
        self.emitter_instance = Some(instance);
        info!(sound = %sound, position = ?self.emitter_position, "Started zone emitter");
        Ok(())
    }

    /// Advance the zone by one simulation tick
    pub fn tick(&mut self, pose_source: &impl ListenerPoseSource, dt: Duration) {
        if self.torn_down {
            return;
        }

        let pose = pose_source.current_pose();
        if let Some(pose) = pose {
            self.listener.update_pose(pose);
        }

        age_markers(&mut self.markers, dt);

        self.scheduler.advance(dt);
        for timer in self.scheduler.take_expired() {
            if let Some(slot) = self.ambient.slot_for_timer(timer) {
                self.fire_ambient_slot(slot);
            }
        }

        // Emitter state is kept as is until a pose arrives again
        let Some(pose) = pose else {
            trace!("No listener pose, skipping zone update");
            return;
        };

        let listener = pose.position;
        if self.gate.evaluate(listener, self.shape.bounds().center) == Proximity::Far {
            return;
        }

        let update = EmitterPositioner {
            curve: &self.curve,
            shape: &self.shape,
            openings: &self.openings,
        }
        .update(&self.listener.pose, self.listener.containment);
        self.apply_emitter_update(&update);

        self.ambient.schedule_idle(&mut self.scheduler, &mut self.rng);
    }

    fn apply_emitter_update(&mut self, update: &EmitterUpdate) {
        self.emitter_position = update.position;

        if let Some(instance) = self.emitter_instance {
            self.playback.set_position(instance, update.position);
            if let Some(rotation) = update.orientation {
                self.playback.set_orientation(instance, rotation);
            }
            if let Some(opening) = update.opening {
                let value = if opening.open { 1.0 } else { 0.0 };
                self.playback
                    .set_parameter(instance, PORTAL_OPEN_PARAMETER, value);
            }
        }

        match update.transition {
            Some(ContainmentTransition::Entered) => {
                debug!(position = ?self.listener.position(), "Listener entered zone");
                self.layers.activate(&mut self.playback);
            }
            Some(ContainmentTransition::Exited) => {
                debug!(position = ?self.listener.position(), "Listener left zone");
                self.layers.deactivate(&mut self.playback);
            }
            None => {}
        }
        self.listener.containment = update.containment;
    }

    /// Respawn an ambient slot whose timer expired.
    ///
    /// Proximity is classified from the latest pose, not from the gate state,
    /// which still holds the previous tick's result while timers drain.
    pub fn fire_ambient_slot(&mut self, slot: SlotId) {
        let near = self.listener.has_pose
            && self
                .gate
                .classify(self.listener.position(), self.shape.bounds().center)
                == Proximity::Near;

        let placement = if near {
            Some(self.sampler.sample(
                &mut self.rng,
                self.shape.bounds(),
                self.shape.control_points(),
                self.listener.position(),
            ))
        } else {
            None
        };

        match self.ambient.fire(slot, &mut self.playback, placement) {
            Some(FireOutcome::Respawned { placement, .. }) => {
                self.markers.push(PlacementMarker::new(placement.point));
            }
            Some(FireOutcome::StartFailed(e)) => {
                warn!(slot = slot.0, "Failed to respawn ambient sound: {}", e);
            }
            Some(FireOutcome::Aborted) | None => {}
        }
    }

    /// Open or close an opening. Out-of-range indices are ignored.
    pub fn set_opening_state(&mut self, index: usize, is_open: bool) {
        match self.openings.get_mut(index) {
            Some(opening) => {
                opening.open = is_open;
                debug!(opening = index, open = is_open, "Opening state changed");
            }
            None => trace!(opening = index, "Ignoring state change for unknown opening"),
        }
    }

    /// Swap the boundary curve and rebuild the cached shape
    pub fn replace_curve(&mut self, curve: C) -> Result<(), ZoneError> {
        check_anchors(&self.openings, &curve)?;
        self.shape = BoundaryShape::from_curve(&curve, self.config.cylinder_height);
        self.curve = curve;
        Ok(())
    }

    /// Cancel all timers and stop every instance the zone owns
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.ambient.teardown(&mut self.scheduler, &mut self.playback);
        self.layers.deactivate(&mut self.playback);
        if let Some(instance) = self.emitter_instance.take() {
            self.playback.stop_and_release(instance);
        }
        self.markers.clear();

        // Listener and gate restart from their initial state
        self.listener = ListenerState::default();
        self.gate = ProximityGate::new(self.config.max_distance);
        info!("Zone torn down");
    }

    /// Debug primitives for the current state, empty unless enabled
    pub fn debug_shapes(&self) -> Vec<DebugShape> {
        collect_debug_shapes(&DebugScene {
            settings: &self.config.debug,
            curve: &self.curve,
            bounds: self.shape.bounds(),
            openings: &self.openings,
            max_distance: self.gate.max_distance(),
            emitter: self.emitter_position,
            markers: &self.markers,
        })
    }

    pub fn emitter_position(&self) -> Vec3 {
        self.emitter_position
    }

    pub fn emitter_instance(&self) -> Option<InstanceHandle> {
        self.emitter_instance
    }

    pub fn proximity(&self) -> Proximity {
        self.gate.state()
    }

    pub fn containment(&self) -> Containment {
        self.listener.containment
    }

    pub fn listener(&self) -> &ListenerState {
        &self.listener
    }

    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    pub fn shape(&self) -> &BoundaryShape {
        &self.shape
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn layers(&self) -> &AmbienceLayers {
        &self.layers
    }

    pub fn ambient_slots(&self) -> &[AmbientSoundSlot] {
        self.ambient.slots()
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut P {
        &mut self.playback
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<C: BoundaryCurve, P: AudioPlayback, S: Scheduler> Drop for SplineAudioZone<C, P, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn check_anchors(openings: &[Opening], curve: &dyn BoundaryCurve) -> Result<(), ZoneError> {
    let count = curve.control_point_count();
    for (i, opening) in openings.iter().enumerate() {
        if opening.anchor_index >= count {
            return Err(ZoneError::OpeningAnchorOutOfRange {
                opening: i,
                anchor: opening.anchor_index,
                count,
            });
        }
    }
    Ok(())
}
