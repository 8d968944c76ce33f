//! Scenario tests for the zone runtime

#[cfg(test)]
mod tests {
    use crate::audio::ambient::{AmbientSoundConfig, DelayRange, SlotState};
    use crate::audio::playback::{AudioPlayback, SoundRef};
    use crate::audio::recording::{PlaybackCall, RecordingPlayback};
    use crate::config::ZoneConfig;
    use crate::core::Transform;
    use crate::curve::PolylineCurve;
    use crate::timer::TimerQueue;
    use crate::zone::*;
    use glam::{Quat, Vec3};
    use std::time::Duration;

    type TestZone = SplineAudioZone<PolylineCurve, RecordingPlayback, TimerQueue>;

    fn square_config() -> ZoneConfig {
        ZoneConfig {
            boundary: PolylineCurve::new(
                vec![
                    Vec3::new(-100.0, -100.0, 0.0),
                    Vec3::new(100.0, -100.0, 0.0),
                    Vec3::new(100.0, 100.0, 0.0),
                    Vec3::new(-100.0, 100.0, 0.0),
                ],
                true,
            ),
            emitter_sound: Some(SoundRef::new("event:/zone/loop")),
            reverb_sound: Some(SoundRef::new("snapshot:/zone/reverb")),
            mix_sound: Some(SoundRef::new("snapshot:/zone/mix")),
            seed: Some(7),
            ..Default::default()
        }
    }

    fn started(config: ZoneConfig) -> TestZone {
        let mut zone =
            SplineAudioZone::from_config(config, RecordingPlayback::new(), TimerQueue::new())
                .unwrap();
        zone.begin().unwrap();
        zone
    }

    fn at(x: f32, y: f32, z: f32) -> Transform {
        Transform::from_position(Vec3::new(x, y, z))
    }

    fn emitter_transform(zone: &TestZone) -> Transform {
        let instance = zone.emitter_instance().unwrap();
        zone.playback().instance(instance).unwrap().transform
    }

    #[test]
    fn test_begin_starts_emitter_at_center() {
        let zone = started(square_config());
        let emitter = zone.emitter_instance().expect("emitter started");
        let recorded = zone.playback().instance(emitter).unwrap();

        assert!(recorded.looping);
        assert_eq!(recorded.transform.position, Vec3::ZERO);
        assert_eq!(zone.emitter_position(), Vec3::ZERO);
    }

    #[test]
    fn test_begin_reports_playback_failure() {
        let mut playback = RecordingPlayback::new();
        playback.mark_missing("event:/zone/loop");
        let mut zone =
            SplineAudioZone::from_config(square_config(), playback, TimerQueue::new()).unwrap();

        assert!(matches!(zone.begin(), Err(ZoneError::Audio(_))));
        assert!(zone.emitter_instance().is_none());
    }

    #[test]
    fn test_rejects_opening_anchor_out_of_range() {
        let mut config = square_config();
        config.openings.push(Opening::new(4, 50.0));

        let result =
            SplineAudioZone::from_config(config, RecordingPlayback::new(), TimerQueue::new());
        assert!(matches!(
            result,
            Err(ZoneError::OpeningAnchorOutOfRange {
                opening: 0,
                anchor: 4,
                count: 4
            })
        ));
    }

    #[test]
    fn test_listener_inside_drives_emitter() {
        let mut zone = started(square_config());
        let pose =
            Transform::from_position_rotation(Vec3::new(10.0, 20.0, 30.0), Quat::from_rotation_z(0.7));

        zone.tick(&pose, Duration::from_millis(16));

        assert_eq!(zone.proximity(), Proximity::Near);
        assert_eq!(zone.containment(), Containment::Inside);
        assert_eq!(zone.emitter_position(), pose.position);
        let transform = emitter_transform(&zone);
        assert_eq!(transform.position, pose.position);
        assert_eq!(transform.rotation, pose.rotation);
    }

    #[test]
    fn test_listener_at_origin_is_inside() {
        let mut zone = started(square_config());
        zone.tick(&Transform::default(), Duration::ZERO);

        assert_eq!(zone.containment(), Containment::Inside);
        assert_eq!(zone.emitter_position(), Vec3::ZERO);
    }

    #[test]
    fn test_far_listener_leaves_emitter_untouched() {
        let mut config = square_config();
        config.max_distance = 300.0;
        let mut zone = started(config);

        zone.tick(&Transform::default(), Duration::ZERO);
        zone.playback_mut().clear_calls();

        zone.tick(&at(500.0, 500.0, 0.0), Duration::from_millis(16));

        assert_eq!(zone.proximity(), Proximity::Far);
        assert_eq!(zone.emitter_position(), Vec3::ZERO);
        assert!(zone.playback().calls().is_empty());
    }

    #[test]
    fn test_listener_at_max_distance_is_near() {
        let mut config = square_config();
        config.max_distance = 300.0;
        let mut zone = started(config);

        zone.tick(&at(300.0, 0.0, 0.0), Duration::ZERO);
        assert_eq!(zone.proximity(), Proximity::Near);
    }

    #[test]
    fn test_outside_listener_snaps_to_edge() {
        let mut zone = started(square_config());
        zone.tick(&at(150.0, 0.0, 0.0), Duration::ZERO);

        assert_eq!(zone.containment(), Containment::Outside);
        assert!((zone.emitter_position() - Vec3::new(100.0, 0.0, 0.0)).length() < 0.001);
        assert!((emitter_transform(&zone).position - Vec3::new(100.0, 0.0, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_missing_pose_skips_positioning() {
        let mut config = square_config();
        config.openings.push(Opening::new(1, 40.0));
        let mut zone = started(config);

        zone.tick(&at(150.0, 0.0, 0.0), Duration::ZERO);
        zone.set_opening_state(0, false);
        let before = zone.emitter_position();
        zone.playback_mut().clear_calls();

        zone.tick(&None::<Transform>, Duration::from_millis(16));

        assert!(zone.playback().calls().is_empty());
        assert_eq!(zone.emitter_position(), before);
        assert_eq!(zone.containment(), Containment::Outside);
    }

    #[test]
    fn test_missing_pose_arms_no_timers() {
        let mut zone = started(ambient_config());
        zone.playback_mut().clear_calls();

        zone.tick(&None::<Transform>, Duration::from_secs(1));

        assert!(!zone.listener().has_pose);
        assert_eq!(zone.emitter_position(), Vec3::ZERO);
        assert_eq!(zone.proximity(), Proximity::Far);
        assert_eq!(zone.scheduler().pending_count(), 0);
        assert_eq!(zone.ambient_slots()[0].state(), SlotState::Idle);
        assert!(zone.playback().calls().is_empty());

        // A pose seen earlier does not keep scheduling alive
        zone.tick(&Transform::default(), Duration::ZERO);
        assert_eq!(zone.scheduler().pending_count(), 1);
        zone.tick(&None::<Transform>, Duration::from_secs(1));
        assert_eq!(zone.ambient_slots()[0].state(), SlotState::Idle);
        assert_eq!(zone.scheduler().pending_count(), 0);
    }

    #[test]
    fn test_layers_follow_containment() {
        let mut zone = started(square_config());
        let reverb = SoundRef::new("snapshot:/zone/reverb");
        let mix = SoundRef::new("snapshot:/zone/mix");

        zone.tick(&Transform::default(), Duration::ZERO);
        assert!(zone.layers().is_active());
        assert_eq!(zone.playback().playing(&reverb).len(), 1);
        assert_eq!(zone.playback().playing(&mix).len(), 1);

        // Staying inside does not restart the layers
        zone.tick(&at(20.0, 0.0, 0.0), Duration::ZERO);
        assert_eq!(zone.playback().start_count(&reverb), 1);

        zone.tick(&at(150.0, 0.0, 0.0), Duration::ZERO);
        assert!(!zone.layers().is_active());
        assert!(zone.playback().playing(&reverb).is_empty());
        assert!(zone.playback().playing(&mix).is_empty());

        zone.tick(&Transform::default(), Duration::ZERO);
        assert_eq!(zone.playback().start_count(&reverb), 2);
    }

    #[test]
    fn test_above_cylinder_is_outside() {
        let mut zone = started(square_config());
        zone.tick(&at(0.0, 0.0, 400.0), Duration::ZERO);

        assert_eq!(zone.containment(), Containment::Outside);
        assert!(!zone.layers().is_active());
    }

    #[test]
    fn test_portal_parameter_follows_opening_state() {
        let mut config = square_config();
        config.openings.push(Opening::new(1, 40.0));
        let mut zone = started(config);
        let emitter = zone.emitter_instance().unwrap();

        zone.tick(&at(150.0, 0.0, 0.0), Duration::ZERO);
        let recorded = zone.playback().instance(emitter).unwrap();
        assert_eq!(recorded.parameters.get(PORTAL_OPEN_PARAMETER), Some(&1.0));
        // Window 180..220 ends at (100, -80)
        assert!((zone.emitter_position() - Vec3::new(100.0, -80.0, 0.0)).length() < 0.001);

        zone.set_opening_state(0, false);
        assert!(!zone.openings()[0].open);
        zone.tick(&at(150.0, 0.0, 0.0), Duration::ZERO);
        let recorded = zone.playback().instance(emitter).unwrap();
        assert_eq!(recorded.parameters.get(PORTAL_OPEN_PARAMETER), Some(&0.0));
    }

    #[test]
    fn test_set_opening_state_out_of_range_is_ignored() {
        let mut config = square_config();
        config.openings.push(Opening::new(0, 40.0));
        let mut zone = started(config);

        zone.set_opening_state(3, false);
        assert!(zone.openings()[0].open);
    }

    #[test]
    fn test_portal_parameter_not_set_inside() {
        let mut config = square_config();
        config.openings.push(Opening::new(1, 40.0));
        let mut zone = started(config);

        zone.tick(&Transform::default(), Duration::ZERO);
        assert!(!zone
            .playback()
            .calls()
            .iter()
            .any(|call| matches!(call, PlaybackCall::SetParameter { .. })));
    }

    fn ambient_config() -> ZoneConfig {
        let mut config = square_config();
        config.max_distance = 300.0;
        config.min_random_sound_distance = 0.0;
        config.ambient_sounds.push(AmbientSoundConfig {
            sound: SoundRef::new("event:/zone/drip"),
            delay_range: DelayRange::new(1.0, 1.0),
        });
        config
    }

    #[test]
    fn test_ambient_sound_respawns_inside_zone() {
        let mut zone = started(ambient_config());
        let drip = SoundRef::new("event:/zone/drip");

        zone.tick(&Transform::default(), Duration::ZERO);
        assert_eq!(zone.ambient_slots()[0].state(), SlotState::Waiting);
        assert_eq!(zone.scheduler().pending_count(), 1);

        zone.tick(&Transform::default(), Duration::from_secs(1));
        let slot = &zone.ambient_slots()[0];
        let instance = slot.active_instance.expect("ambient sound started");
        let placement = slot.last_placement.unwrap();
        assert!(zone.playback().is_valid(instance));
        assert_eq!(
            zone.playback().instance(instance).unwrap().transform.position,
            placement.point
        );
        assert!(placement.attempts <= MAX_PLACEMENT_ATTEMPTS + 1);
        // Re-armed on the same tick
        assert_eq!(slot.state(), SlotState::Waiting);
        assert_eq!(zone.playback().start_count(&drip), 1);

        zone.tick(&Transform::default(), Duration::from_secs(1));
        assert_eq!(zone.playback().start_count(&drip), 2);
        assert!(!zone.playback().is_valid(instance));
        assert_eq!(zone.playback().playing(&drip).len(), 1);
    }

    #[test]
    fn test_ambient_fire_while_far_aborts_and_waits_for_near() {
        let mut zone = started(ambient_config());
        let drip = SoundRef::new("event:/zone/drip");

        zone.tick(&Transform::default(), Duration::ZERO);
        zone.tick(&Transform::default(), Duration::from_secs(1));
        assert!(zone.ambient_slots()[0].active_instance.is_some());

        // Listener walks away before the next respawn
        zone.tick(&at(500.0, 500.0, 0.0), Duration::from_millis(500));
        assert_eq!(zone.proximity(), Proximity::Far);
        assert_eq!(zone.ambient_slots()[0].state(), SlotState::Waiting);

        zone.tick(&at(500.0, 500.0, 0.0), Duration::from_secs(1));
        let slot = &zone.ambient_slots()[0];
        assert!(slot.active_instance.is_none());
        assert_eq!(slot.state(), SlotState::Idle);
        assert!(zone.playback().playing(&drip).is_empty());

        zone.tick(&at(500.0, 500.0, 0.0), Duration::from_secs(5));
        assert_eq!(zone.scheduler().pending_count(), 0);
        assert_eq!(zone.playback().start_count(&drip), 1);

        zone.tick(&Transform::default(), Duration::ZERO);
        assert_eq!(zone.ambient_slots()[0].state(), SlotState::Waiting);
        assert_eq!(zone.scheduler().pending_count(), 1);
    }

    #[test]
    fn test_ambient_fire_on_tick_listener_leaves_aborts() {
        let mut zone = started(ambient_config());
        let drip = SoundRef::new("event:/zone/drip");

        zone.tick(&Transform::default(), Duration::ZERO);
        assert_eq!(zone.ambient_slots()[0].state(), SlotState::Waiting);

        // Timer expires on the same tick the listener moves out of range
        zone.tick(&at(500.0, 500.0, 0.0), Duration::from_secs(1));

        assert_eq!(zone.proximity(), Proximity::Far);
        assert_eq!(zone.playback().start_count(&drip), 0);
        assert!(zone.ambient_slots()[0].active_instance.is_none());
        assert_eq!(zone.ambient_slots()[0].state(), SlotState::Idle);
    }

    #[test]
    fn test_ambient_fire_on_tick_listener_returns_respawns() {
        let mut zone = started(ambient_config());
        let drip = SoundRef::new("event:/zone/drip");

        zone.tick(&Transform::default(), Duration::ZERO);
        zone.tick(&at(500.0, 500.0, 0.0), Duration::from_millis(500));
        assert_eq!(zone.proximity(), Proximity::Far);

        // Back in range on the tick the timer expires
        zone.tick(&Transform::default(), Duration::from_millis(500));
        assert_eq!(zone.playback().start_count(&drip), 1);
        assert!(zone.ambient_slots()[0].active_instance.is_some());
    }

    #[test]
    fn test_ambient_start_failure_is_not_fatal() {
        let mut playback = RecordingPlayback::new();
        playback.mark_missing("event:/zone/drip");
        let mut zone =
            SplineAudioZone::from_config(ambient_config(), playback, TimerQueue::new()).unwrap();
        zone.begin().unwrap();

        zone.tick(&Transform::default(), Duration::ZERO);
        zone.tick(&Transform::default(), Duration::from_secs(1));

        assert!(zone.ambient_slots()[0].active_instance.is_none());
        assert_eq!(zone.ambient_slots()[0].state(), SlotState::Waiting);
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut zone = started(ambient_config());
        zone.tick(&Transform::default(), Duration::ZERO);
        zone.tick(&Transform::default(), Duration::from_secs(1));
        assert!(zone.playback().live_count() >= 4);

        zone.teardown();
        assert_eq!(zone.playback().live_count(), 0);
        assert_eq!(zone.scheduler().pending_count(), 0);
        assert!(zone.emitter_instance().is_none());
        assert!(!zone.layers().is_active());

        let calls = zone.playback().calls().len();
        zone.teardown();
        zone.tick(&Transform::default(), Duration::from_secs(5));
        assert_eq!(zone.playback().calls().len(), calls);
    }

    #[test]
    fn test_begin_after_teardown_restarts_layers() {
        let mut zone = started(square_config());
        let reverb = SoundRef::new("snapshot:/zone/reverb");

        zone.tick(&Transform::default(), Duration::ZERO);
        assert!(zone.layers().is_active());

        zone.teardown();
        assert_eq!(zone.containment(), Containment::Outside);
        assert_eq!(zone.proximity(), Proximity::Far);

        zone.begin().unwrap();
        zone.tick(&Transform::default(), Duration::ZERO);

        assert_eq!(zone.containment(), Containment::Inside);
        assert!(zone.layers().is_active());
        assert_eq!(zone.playback().start_count(&reverb), 2);
        assert_eq!(zone.playback().playing(&reverb).len(), 1);
    }

    #[test]
    fn test_debug_shapes_only_when_enabled() {
        let mut zone = started(ambient_config());
        zone.tick(&Transform::default(), Duration::ZERO);
        assert!(zone.debug_shapes().is_empty());

        let mut config = ambient_config();
        config.debug.show_debug = true;
        let mut zone = started(config);
        zone.tick(&Transform::default(), Duration::ZERO);
        zone.tick(&Transform::default(), Duration::from_secs(1));

        let shapes = zone.debug_shapes();
        assert!(matches!(shapes[0], DebugShape::Cylinder { .. }));
        let spheres = shapes
            .iter()
            .filter(|shape| matches!(shape, DebugShape::Sphere { .. }))
            .count();
        // Max distance, emitter, respawn marker
        assert_eq!(spheres, 3);
    }

    #[test]
    fn test_replace_curve_rebuilds_shape() {
        let mut zone = started(square_config());
        let bigger = PolylineCurve::new(
            vec![
                Vec3::new(-200.0, -200.0, 0.0),
                Vec3::new(200.0, -200.0, 0.0),
                Vec3::new(200.0, 200.0, 0.0),
                Vec3::new(-200.0, 200.0, 0.0),
            ],
            true,
        );

        zone.replace_curve(bigger).unwrap();
        zone.tick(&at(150.0, 0.0, 0.0), Duration::ZERO);

        assert!((zone.shape().bounds().radius - 200.0 * 2f32.sqrt()).abs() < 0.01);
        assert_eq!(zone.containment(), Containment::Inside);
    }
}
