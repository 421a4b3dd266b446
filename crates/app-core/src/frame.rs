//! Per-frame simulation step.
//!
//! One `advance` call runs the whole update sequence to completion: drain
//! queued commands, integrate particles, advance orbits, refresh the center
//! pulse, then re-sort draw order. Nothing yields mid-frame, which keeps the
//! sorter's hysteresis and the smoothing state consistent within a frame.

use std::time::Duration;

use instant::Instant;

use crate::constants::{CENTER_PULSE_RATE, NOMINAL_FRAME_SEC};
use crate::depth::sort_back_to_front;
use crate::math::{frame_blend, lerp_vec3};
use crate::scene::{orbit_point, Scene, SceneEvent};

/// Wall-clock delta source. `instant` keeps this usable from wasm callers.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a wall-clock delta to nominal-frame units and clamp it, so a
/// stalled tab or GC pause cannot teleport the simulation.
#[inline]
pub fn normalize_delta(dt: Duration, clamp_frames: f32) -> f32 {
    (dt.as_secs_f32() / NOMINAL_FRAME_SEC).clamp(0.0, clamp_frames)
}

impl Scene {
    /// Advance the simulation by a measured wall-clock delta.
    ///
    /// Ordering contract: commands → particles → orbs → center pulse →
    /// depth sort. Draw-list composition (`compose`) reads the state this
    /// leaves behind.
    pub fn advance(&mut self, dt: Duration) -> Vec<SceneEvent> {
        let mut events = Vec::new();
        self.apply_commands(&mut events);

        let dt_frames = normalize_delta(dt, self.tuning.delta_clamp_frames);
        if !self.paused {
            let dt_sec = dt_frames * NOMINAL_FRAME_SEC;
            self.elapsed += dt_sec;
            let blend = frame_blend(self.tuning.position_blend, dt_frames);

            let bound = self.tuning.particle_bound;
            for p in &mut self.particles {
                p.target += p.velocity * dt_sec;
                for axis in 0..3 {
                    if p.target[axis].abs() > bound {
                        p.velocity[axis] = -p.velocity[axis];
                        p.target[axis] = p.target[axis].clamp(-bound, bound);
                    }
                }
                p.displayed = lerp_vec3(p.displayed, p.target, blend);
            }

            for orb in &mut self.orbs {
                orb.orbit_angle += orb.angular_speed * dt_sec;
                orb.target = orbit_point(
                    orb.orbit_radius,
                    orb.orbit_angle,
                    orb.orbit_phase,
                    self.elapsed,
                );
                orb.displayed = lerp_vec3(orb.displayed, orb.target, blend);
            }

            self.center.pulse = 0.5 + 0.5 * (self.elapsed * CENTER_PULSE_RATE).sin();
        }

        // Re-sorted even while paused: commands may have rotated the camera.
        self.draw_order = sort_back_to_front(
            &mut self.orbs,
            &self.projector,
            &self.camera,
            &self.viewport,
            self.tuning.depth_hysteresis,
        );
        events
    }
}
