//! Zone demo entry point
//!
//! Loads a zone configuration (the path given as first argument, or a built-in
//! square), walks a listener entity through it and logs what the runtime does.

mod debug_zone;

use debug_zone::DebugState;
use glam::{Quat, Vec3};
use spline_audio::prelude::*;
use std::time::Duration;
use tracing::{error, info};

/// Simulation step
const TICK: Duration = Duration::from_millis(100);

fn main() {
    // Initialize logging
    spline_audio::init_logging();
    info!("Starting spline audio zone demo");

    let config = match std::env::args().nth(1) {
        Some(path) => match ZoneConfig::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load zone configuration {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => demo_config(),
    };

    let mut zone =
        match SplineAudioZone::from_config(config, RecordingPlayback::new(), TimerQueue::new()) {
            Ok(zone) => zone,
            Err(e) => {
                error!("Failed to create zone: {}", e);
                std::process::exit(1);
            }
        };

    if let Err(e) = zone.begin() {
        error!("Failed to start zone: {}", e);
        std::process::exit(1);
    }

    // Create ECS world with a listener
    let mut world = hecs::World::new();
    let camera = world.spawn((AudioListener::default(), Transform::default()));

    let mut debug_state = DebugState::default();
    let path = walk_path(zone.shape().bounds().center, zone.shape().bounds().radius);

    for (step, position) in path.into_iter().enumerate() {
        if let Ok(mut transform) = world.get::<&mut Transform>(camera) {
            // Facing along the walk (+X)
            *transform = Transform::from_position_rotation(position, Quat::IDENTITY);
        }

        // Close the first opening halfway through the walk
        if step == 40 {
            zone.set_opening_state(0, false);
        }

        zone.tick(&world, TICK);
        debug_state.update(&zone);
        debug_state.log_summary(&world);

        info!(
            step,
            listener = ?position,
            emitter = ?zone.emitter_position(),
            proximity = ?zone.proximity(),
            containment = ?zone.containment(),
            "Tick"
        );
    }

    let playback = zone.playback();
    info!(
        calls = playback.calls().len(),
        live_instances = playback.live_count(),
        "Walk finished"
    );

    zone.teardown();
    info!(live_instances = zone.playback().live_count(), "Demo finished");
}

/// A straight walk from far outside, through the zone and out the other side
fn walk_path(center: Vec3, radius: f32) -> Vec<Vec3> {
    let start = center - Vec3::X * (radius * 4.0);
    let end = center + Vec3::X * (radius * 4.0);
    let steps = 80;

    (0..=steps)
        .map(|i| start.lerp(end, i as f32 / steps as f32))
        .collect()
}

/// Square cave with one opening and a couple of ambient sounds
fn demo_config() -> ZoneConfig {
    ZoneConfig {
        boundary: PolylineCurve::new(
            vec![
                Vec3::new(-1000.0, -1000.0, 0.0),
                Vec3::new(1000.0, -1000.0, 0.0),
                Vec3::new(1000.0, 1000.0, 0.0),
                Vec3::new(-1000.0, 1000.0, 0.0),
            ],
            true,
        ),
        emitter_sound: Some(SoundRef::new("event:/cave/loop")),
        reverb_sound: Some(SoundRef::new("snapshot:/cave/reverb")),
        mix_sound: Some(SoundRef::new("snapshot:/cave/mix")),
        max_distance: 5000.0,
        openings: vec![Opening::new(1, 400.0)],
        ambient_sounds: vec![
            AmbientSoundConfig {
                sound: SoundRef::new("event:/cave/drip"),
                delay_range: DelayRange::new(0.5, 2.0),
            },
            AmbientSoundConfig {
                sound: SoundRef::new("event:/cave/bats"),
                delay_range: DelayRange::new(3.0, 6.0),
            },
        ],
        debug: DebugSettings {
            show_debug: true,
            opening_debug_precision: 50.0,
        },
        seed: Some(2024),
        ..Default::default()
    }
}
