//! Perspective projection into screen space.
//!
//! The scene uses a rotate-then-divide projection rather than full matrix
//! clip space: a point is rotated by the camera's yaw and pitch, then scaled
//! by `focal / (focal + depth * zoom)`. The scale output doubles as the
//! draw radius multiplier, so it must be strictly positive and bounded for
//! every input, including points behind the camera.

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::config::VisualTuning;

#[derive(Clone, Copy, Debug, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// One projected point: screen position, depth-derived scale, camera-space depth.
#[derive(Clone, Copy, Debug)]
pub struct Projected {
    pub screen: Vec2,
    pub scale: f32,
    pub depth: f32,
}

/// Projection parameters snapshotted from the scene tuning.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    pub focal_length: f32,
    pub scale_min: f32,
    pub scale_max: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Projector {
    pub fn from_tuning(t: &VisualTuning) -> Self {
        Self {
            focal_length: t.focal_length,
            scale_min: t.scale_min,
            scale_max: t.scale_max,
            zoom_min: t.zoom_min,
            zoom_max: t.zoom_max,
        }
    }

    /// Rotate `point` into camera space and project it onto `viewport`.
    pub fn project(&self, point: Vec3, camera: &Camera, viewport: &Viewport) -> Projected {
        let (sin_yaw, cos_yaw) = camera.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = camera.pitch.sin_cos();

        // Yaw about Y, then pitch about X.
        let x1 = point.x * cos_yaw - point.z * sin_yaw;
        let z1 = point.x * sin_yaw + point.z * cos_yaw;
        let y2 = point.y * cos_pitch - z1 * sin_pitch;
        let depth = point.y * sin_pitch + z1 * cos_pitch;

        // Zoom is clamped again here: the camera already enforces the range,
        // but the denominator below must never see a rogue value.
        let zoom = camera.zoom().clamp(self.zoom_min, self.zoom_max);
        let denom = self.focal_length + depth * zoom;
        let scale = if denom <= 0.0 || !denom.is_finite() {
            self.scale_min
        } else {
            (self.focal_length / denom).clamp(self.scale_min, self.scale_max)
        };

        let screen = viewport.center() + Vec2::new(x1, y2) * scale;
        Projected {
            screen,
            scale,
            depth,
        }
    }
}
