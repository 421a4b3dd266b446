//! Per-scene tuning parameters.
//!
//! The numeric feel of the visualizer (zoom range, smoothing, gesture
//! thresholds) is data, not hard-coded invariants. Both structs validate
//! once at construction; nothing inside a frame ever re-checks them.

use std::time::Duration;

use crate::constants::*;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("zoom range [{min}, {max}] is empty or non-positive")]
    ZoomRange { min: f32, max: f32 },
    #[error("scale range [{min}, {max}] is empty or non-positive")]
    ScaleRange { min: f32, max: f32 },
    #[error("focal length {0} must be positive")]
    FocalLength(f32),
    #[error("position blend {0} must be in (0, 1]")]
    PositionBlend(f32),
    #[error("particle pool size must be non-zero")]
    EmptyParticlePool,
    #[error("particle bound {0} must be positive")]
    ParticleBound(f32),
    #[error("swipe window is empty ({min:?} >= {max:?})")]
    SwipeWindow { min: Duration, max: Duration },
}

/// Visual/simulation tuning for one scene instance.
#[derive(Clone, Debug)]
pub struct VisualTuning {
    pub focal_length: f32,
    pub scale_min: f32,
    pub scale_max: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub position_blend: f32,
    pub depth_hysteresis: f32,
    pub particle_count: usize,
    pub particle_bound: f32,
    pub delta_clamp_frames: f32,
}

impl Default for VisualTuning {
    fn default() -> Self {
        Self {
            focal_length: FOCAL_LENGTH,
            scale_min: SCALE_MIN,
            scale_max: SCALE_MAX,
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            position_blend: POSITION_BLEND,
            depth_hysteresis: DEPTH_HYSTERESIS,
            particle_count: PARTICLE_COUNT,
            particle_bound: PARTICLE_BOUND,
            delta_clamp_frames: DELTA_CLAMP_FRAMES,
        }
    }
}

impl VisualTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_min > 0.0 && self.zoom_min < self.zoom_max) {
            return Err(ConfigError::ZoomRange {
                min: self.zoom_min,
                max: self.zoom_max,
            });
        }
        if !(self.scale_min > 0.0 && self.scale_min < self.scale_max) {
            return Err(ConfigError::ScaleRange {
                min: self.scale_min,
                max: self.scale_max,
            });
        }
        if !(self.focal_length > 0.0) {
            return Err(ConfigError::FocalLength(self.focal_length));
        }
        if !(self.position_blend > 0.0 && self.position_blend <= 1.0) {
            return Err(ConfigError::PositionBlend(self.position_blend));
        }
        if self.particle_count == 0 {
            return Err(ConfigError::EmptyParticlePool);
        }
        if !(self.particle_bound > 0.0) {
            return Err(ConfigError::ParticleBound(self.particle_bound));
        }
        Ok(())
    }
}

/// Thresholds for the hand-gesture classifier.
///
/// Distances are meters in tracked-hand space. The defaults are tuned for
/// feel, not derived; callers with different tracking hardware are expected
/// to adjust them.
#[derive(Clone, Debug)]
pub struct GestureConfig {
    /// Thumb-tip to index-tip distance below which a pinch registers.
    pub pinch_distance: f32,
    /// Wrist-to-fingertip distance below which a finger counts as curled.
    pub grab_curl_distance: f32,
    /// Wrist-to-fingertip distance above which a finger counts as extended.
    pub finger_extended_distance: f32,
    /// Total wrist displacement required for a swipe.
    pub swipe_min_distance: f32,
    /// Swipes faster than this are rejected as jitter.
    pub swipe_window_min: Duration,
    /// Swipes slower than this are rejected as drift; the anchor resets.
    pub swipe_window_max: Duration,
    /// Zoom-multiplier change per meter of pinch-distance travel.
    pub pinch_zoom_gain: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_distance: PINCH_DISTANCE_M,
            grab_curl_distance: GRAB_CURL_DISTANCE_M,
            finger_extended_distance: FINGER_EXTENDED_M,
            swipe_min_distance: SWIPE_MIN_DISTANCE_M,
            swipe_window_min: Duration::from_millis(SWIPE_WINDOW_MIN_MS),
            swipe_window_max: Duration::from_millis(SWIPE_WINDOW_MAX_MS),
            pinch_zoom_gain: PINCH_ZOOM_GAIN,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.swipe_window_min >= self.swipe_window_max {
            return Err(ConfigError::SwipeWindow {
                min: self.swipe_window_min,
                max: self.swipe_window_max,
            });
        }
        Ok(())
    }
}
