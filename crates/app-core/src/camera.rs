//! Orbital camera state.
//!
//! One instance per scene. Only the interaction bridge mutates it (via the
//! scene command queue); projection reads it. Every mutation clamps, so no
//! caller can push zoom or pitch into a range that breaks projection math.

use crate::constants::PITCH_LIMIT;

#[derive(Clone, Debug)]
pub struct Camera {
    pub pitch: f32,
    pub yaw: f32,
    zoom: f32,
    zoom_min: f32,
    zoom_max: f32,
}

impl Camera {
    pub fn new(zoom_min: f32, zoom_max: f32) -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            zoom: 1.0f32.clamp(zoom_min, zoom_max),
            zoom_min,
            zoom_max,
        }
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Add a rotation delta (radians). Pitch is limited so the scene never
    /// flips; yaw wraps freely.
    pub fn apply_rotation(&mut self, dyaw: f32, dpitch: f32) {
        self.yaw += dyaw;
        self.pitch = (self.pitch + dpitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Multiply zoom by a factor, then clamp to the configured range.
    pub fn apply_zoom_factor(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = (self.zoom * factor).clamp(self.zoom_min, self.zoom_max);
        }
    }

    /// Add a fixed step to zoom (swipe up/down path).
    pub fn apply_zoom_step(&mut self, step: f32) {
        if step.is_finite() {
            self.zoom = (self.zoom + step).clamp(self.zoom_min, self.zoom_max);
        }
    }
}
