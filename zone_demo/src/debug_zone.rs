//! Zone debug visualization for the demo
//!
//! There is no renderer here, so the shapes are collected every tick and
//! summarized in the log instead of drawn.

use spline_audio::audio::{AudioPlayback, ListenerPoseSource};
use spline_audio::curve::BoundaryCurve;
use spline_audio::timer::Scheduler;
use spline_audio::zone::{DebugShape, SplineAudioZone};
use tracing::debug;

/// Debug shapes collected for the current tick
#[derive(Default)]
pub struct DebugState {
    shapes: Vec<DebugShape>,
}

impl DebugState {
    /// Collect this tick's debug shapes
    pub fn update<C, P, S>(&mut self, zone: &SplineAudioZone<C, P, S>)
    where
        C: BoundaryCurve,
        P: AudioPlayback,
        S: Scheduler,
    {
        self.shapes.clear();
        self.shapes.extend(zone.debug_shapes());
    }

    /// Log a one-line summary of the collected shapes
    pub fn log_summary(&self, listener: &impl ListenerPoseSource) {
        let (mut lines, mut spheres, mut points) = (0, 0, 0);
        for shape in &self.shapes {
            match shape {
                DebugShape::Line { .. } => lines += 1,
                DebugShape::Sphere { .. } => spheres += 1,
                DebugShape::Point { .. } => points += 1,
                DebugShape::Cylinder { .. } => {}
            }
        }

        debug!(
            lines,
            spheres,
            points,
            listener = ?listener.current_pose().map(|pose| pose.position),
            "Debug shapes"
        );
    }
}
