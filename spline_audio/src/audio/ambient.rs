//! Randomly respawning ambient one-shots
//!
//! Each configured ambient sound owns a slot. A slot is `Idle` until the
//! scheduling pass arms a timer with a random delay, then `Waiting` until the
//! timer fires. Firing stops the previous instance and, when the listener is
//! near, starts a new one at a random point inside the zone. Timers map back
//! to slots by index, so the slot list can be inspected or grown without
//! invalidating scheduled work.

use crate::audio::playback::{AudioError, AudioPlayback, InstanceHandle, SoundRef};
use crate::core::Transform;
use crate::timer::{Scheduler, TimerHandle};
use crate::zone::sampler::Placement;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Range of respawn delays in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min: f32,
    pub max: f32,
}

impl DelayRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw a delay uniformly from the range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let seconds = if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        };
        Duration::from_secs_f32(seconds.max(0.0))
    }
}

/// Configuration of one ambient sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientSoundConfig {
    pub sound: SoundRef,
    pub delay_range: DelayRange,
}

/// Stable index of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No timer armed
    Idle,
    /// Timer armed and not yet handled
    Waiting,
}

/// Runtime state of one ambient sound
#[derive(Debug, Clone)]
pub struct AmbientSoundSlot {
    pub sound: SoundRef,
    pub delay_range: DelayRange,
    pub active_instance: Option<InstanceHandle>,
    pub pending_timer: Option<TimerHandle>,
    /// Where the last instance was placed
    pub last_placement: Option<Placement>,
}

impl AmbientSoundSlot {
    pub fn new(config: &AmbientSoundConfig) -> Self {
        Self {
            sound: config.sound.clone(),
            delay_range: config.delay_range,
            active_instance: None,
            pending_timer: None,
            last_placement: None,
        }
    }

    pub fn state(&self) -> SlotState {
        if self.pending_timer.is_some() {
            SlotState::Waiting
        } else {
            SlotState::Idle
        }
    }
}

/// What happened when a slot's timer was handled
#[derive(Debug, Clone, PartialEq)]
pub enum FireOutcome {
    /// A new instance was started
    Respawned {
        instance: InstanceHandle,
        placement: Placement,
    },
    /// The listener was far; nothing was started
    Aborted,
    /// The playback service refused to start the sound
    StartFailed(AudioError),
}

/// Owns the ambient slots and their timers
#[derive(Debug, Default)]
pub struct AmbientSoundScheduler {
    slots: Vec<AmbientSoundSlot>,
}

impl AmbientSoundScheduler {
    pub fn new(configs: &[AmbientSoundConfig]) -> Self {
        Self {
            slots: configs.iter().map(AmbientSoundSlot::new).collect(),
        }
    }

    pub fn slots(&self) -> &[AmbientSoundSlot] {
        &self.slots
    }

    pub fn slot(&self, id: SlotId) -> Option<&AmbientSoundSlot> {
        self.slots.get(id.0)
    }

    /// Arm a timer for every idle slot. Returns how many were armed.
    pub fn schedule_idle<S, R>(&mut self, scheduler: &mut S, rng: &mut R) -> usize
    where
        S: Scheduler + ?Sized,
        R: Rng + ?Sized,
    {
        let mut armed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.pending_timer.is_some() {
                continue;
            }
            let delay = slot.delay_range.sample(rng);
            slot.pending_timer = Some(scheduler.after(delay));
            armed += 1;
            debug!(
                slot = index,
                sound = %slot.sound,
                delay_secs = delay.as_secs_f32(),
                "Armed ambient sound timer"
            );
        }
        armed
    }

    /// Slot whose pending timer is `timer`
    pub fn slot_for_timer(&self, timer: TimerHandle) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|slot| slot.pending_timer == Some(timer))
            .map(SlotId)
    }

    /// Handle an expired timer for `id`.
    ///
    /// The previous instance is always stopped and released. A new instance is
    /// started at `placement` unless it is `None` (listener far away). The slot
    /// is left idle either way and gets re-armed by the next scheduling pass.
    pub fn fire<P>(
        &mut self,
        id: SlotId,
        playback: &mut P,
        placement: Option<Placement>,
    ) -> Option<FireOutcome>
    where
        P: AudioPlayback + ?Sized,
    {
        let slot = self.slots.get_mut(id.0)?;
        slot.pending_timer = None;

        if let Some(previous) = slot.active_instance.take() {
            playback.stop_and_release(previous);
        }

        let Some(placement) = placement else {
            debug!(slot = id.0, sound = %slot.sound, "Listener far, ambient sound skipped");
            return Some(FireOutcome::Aborted);
        };

        match playback.start(&slot.sound, Transform::from_position(placement.point), true) {
            Ok(instance) => {
                slot.active_instance = Some(instance);
                slot.last_placement = Some(placement);
                debug!(
                    slot = id.0,
                    sound = %slot.sound,
                    position = ?placement.point,
                    attempts = placement.attempts,
                    "Respawned ambient sound"
                );
                Some(FireOutcome::Respawned {
                    instance,
                    placement,
                })
            }
            Err(e) => Some(FireOutcome::StartFailed(e)),
        }
    }

    /// Cancel every timer and stop every instance
    pub fn teardown<S, P>(&mut self, scheduler: &mut S, playback: &mut P)
    where
        S: Scheduler + ?Sized,
        P: AudioPlayback + ?Sized,
    {
        for slot in &mut self.slots {
            if let Some(timer) = slot.pending_timer.take() {
                scheduler.cancel(timer);
            }
            if let Some(instance) = slot.active_instance.take() {
                playback.stop_and_release(instance);
            }
        }
    }
}
