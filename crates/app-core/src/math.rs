//! Frame-rate-independent interpolation helpers.
//!
//! Display quantities (positions, opacities, rotation) are always moved
//! toward their targets with a blend factor proportional to the measured
//! delta-time, so settling time stays constant across refresh rates.

use glam::Vec3;

/// Linear interpolation with a defensively clamped factor.
#[inline]
pub fn lerp(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor.clamp(0.0, 1.0)
}

/// Component-wise `lerp` for vectors.
#[inline]
pub fn lerp_vec3(current: Vec3, target: Vec3, factor: f32) -> Vec3 {
    current + (target - current) * factor.clamp(0.0, 1.0)
}

/// Per-call blend factor for a base rate expressed per nominal frame.
///
/// `dt_frames` is the normalized, clamped delta (1.0 at the nominal rate).
#[inline]
pub fn frame_blend(base_factor: f32, dt_frames: f32) -> f32 {
    (base_factor * dt_frames).clamp(0.0, 1.0)
}
