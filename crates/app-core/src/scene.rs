//! Scene state: asset orbs, the ambient particle pool, the central
//! aggregate orb, and the camera.
//!
//! All external input (asset swaps, pointer, gestures, display flags) enters
//! through a command queue drained at the start of each frame update, so a
//! frame sees one consistent state and updates are reproducible in tests.

use glam::{Vec2, Vec3};
use rand::prelude::*;

use crate::assets::{palette_color, AssetRecord, LogoCache};
use crate::camera::Camera;
use crate::config::{ConfigError, VisualTuning};
use crate::constants::*;
use crate::projection::{Projector, Viewport};

/// One portfolio holding rendered as an orbiting orb.
#[derive(Clone, Debug)]
pub struct AssetOrb {
    pub symbol: String,
    pub value: f64,
    pub color: [f32; 3],
    pub has_logo: bool,
    pub orbit_angle: f32,
    pub orbit_radius: f32,
    pub angular_speed: f32,
    pub orbit_phase: f32,
    /// Draw radius before projection scaling; never below `ORB_RADIUS_MIN`.
    pub radius: f32,
    pub target: Vec3,
    pub displayed: Vec3,
    /// Committed depth used by the sorter's hysteresis; NaN until first sort.
    pub(crate) last_depth: f32,
}

/// Decorative background particle. The pool is fixed-size and recycled in
/// place for the life of the scene.
#[derive(Clone, Debug)]
pub struct Particle {
    pub target: Vec3,
    pub displayed: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub brightness: f32,
}

/// The aggregate orb pinned at the origin.
#[derive(Clone, Debug)]
pub struct CenterOrb {
    pub radius: f32,
    /// Pulse parameter in [0, 1], recomputed from elapsed time each frame.
    pub pulse: f32,
}

/// External inputs, applied in arrival order at the start of a frame update.
#[derive(Clone, Debug)]
pub enum SceneCommand {
    ReplaceAssets(Vec<AssetRecord>),
    /// Rotation delta in radians (yaw, pitch), already gain-scaled.
    Rotate(Vec2),
    /// Multiplicative zoom; re-clamped here regardless of the sender.
    ZoomFactor(f32),
    /// Additive zoom step; re-clamped here regardless of the sender.
    ZoomStep(f32),
    /// Move the selected-asset index by an offset, wrapping.
    SelectOffset(i32),
    SetBalancesHidden(bool),
    SetImmersive(bool),
    SetPaused(bool),
}

/// Notifications produced while applying commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    SelectionChanged(usize),
    AssetsReplaced { count: usize },
}

pub struct Scene {
    pub(crate) tuning: VisualTuning,
    pub(crate) viewport: Viewport,
    pub(crate) projector: Projector,
    pub(crate) camera: Camera,
    pub(crate) orbs: Vec<AssetOrb>,
    pub(crate) particles: Vec<Particle>,
    pub(crate) center: CenterOrb,
    pub(crate) selected: usize,
    pub(crate) balances_hidden: bool,
    pub(crate) immersive: bool,
    pub(crate) paused: bool,
    pub(crate) elapsed: f32,
    pub(crate) total_value: f64,
    pub(crate) pending: Vec<SceneCommand>,
    pub(crate) logos: LogoCache,
    pub(crate) draw_order: Vec<usize>,
    rng: StdRng,
}

impl Scene {
    /// Build an empty scene. `seed` drives particle drift and orbit phases so
    /// identical seeds replay identical frames.
    pub fn new(tuning: VisualTuning, viewport: Viewport, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = spawn_particles(&mut rng, tuning.particle_count, tuning.particle_bound);
        let camera = Camera::new(tuning.zoom_min, tuning.zoom_max);
        let projector = Projector::from_tuning(&tuning);
        Ok(Self {
            tuning,
            viewport,
            projector,
            camera,
            orbs: Vec::new(),
            particles,
            center: CenterOrb {
                radius: CENTER_ORB_RADIUS,
                pulse: 0.0,
            },
            selected: 0,
            balances_hidden: false,
            immersive: false,
            paused: false,
            elapsed: 0.0,
            total_value: 0.0,
            pending: Vec::new(),
            logos: LogoCache::new(),
            draw_order: Vec::new(),
            rng,
        })
    }

    pub fn queue(&mut self, cmd: SceneCommand) {
        self.pending.push(cmd);
    }

    /// Host-environment resize; not part of the command surface.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn orbs(&self) -> &[AssetOrb] {
        &self.orbs
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Back-to-front orb indices from the most recent `advance`.
    pub fn draw_order(&self) -> &[usize] {
        &self.draw_order
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn balances_hidden(&self) -> bool {
        self.balances_hidden
    }

    pub fn immersive(&self) -> bool {
        self.immersive
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn logos(&self) -> &LogoCache {
        &self.logos
    }

    pub fn logos_mut(&mut self) -> &mut LogoCache {
        &mut self.logos
    }

    /// Drain and apply queued commands. Camera mutations re-clamp here even
    /// though the interaction bridge already clamped: a bridge bug must not
    /// be able to reach projection with an out-of-range value.
    pub(crate) fn apply_commands(&mut self, events: &mut Vec<SceneEvent>) {
        let pending = std::mem::take(&mut self.pending);
        for cmd in pending {
            match cmd {
                SceneCommand::ReplaceAssets(records) => {
                    self.rebuild_assets(records);
                    events.push(SceneEvent::AssetsReplaced {
                        count: self.orbs.len(),
                    });
                }
                SceneCommand::Rotate(delta) => {
                    self.camera.apply_rotation(delta.x, delta.y);
                }
                SceneCommand::ZoomFactor(factor) => {
                    self.camera
                        .apply_zoom_factor(factor.clamp(ZOOM_FACTOR_MIN, ZOOM_FACTOR_MAX));
                }
                SceneCommand::ZoomStep(step) => {
                    self.camera
                        .apply_zoom_step(step.clamp(-ZOOM_STEP, ZOOM_STEP));
                }
                SceneCommand::SelectOffset(offset) => {
                    if !self.orbs.is_empty() {
                        let len = self.orbs.len() as i64;
                        let next = (self.selected as i64 + offset as i64).rem_euclid(len) as usize;
                        if next != self.selected {
                            self.selected = next;
                            events.push(SceneEvent::SelectionChanged(next));
                        }
                    }
                }
                SceneCommand::SetBalancesHidden(hidden) => self.balances_hidden = hidden,
                SceneCommand::SetImmersive(on) => self.immersive = on,
                SceneCommand::SetPaused(paused) => self.paused = paused,
            }
        }
    }

    /// Recreate the orb set from a fresh asset list. No incremental diffing:
    /// one list generation, one orb generation.
    fn rebuild_assets(&mut self, records: Vec<AssetRecord>) {
        let values: Vec<f64> = records.iter().map(|r| r.value.max(0.0)).collect();
        let total: f64 = values.iter().sum();
        self.total_value = total;

        let count = records.len();
        let equal_share = if count > 0 { 1.0 / count as f64 } else { 0.0 };

        let mut orbs = Vec::with_capacity(count);
        for (i, (record, value)) in records.into_iter().zip(values).enumerate() {
            // Zero-total portfolios fall back to equal shares so the radii
            // below stay finite and positive.
            let share = if total > 0.0 {
                (value / total) as f32
            } else {
                equal_share as f32
            };
            let orbit_radius = ORBIT_RADIUS_MIN + ORBIT_RADIUS_SPAN * share;
            let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
            let angular_speed = direction * ORBIT_SPEED_BASE * (ORBIT_RADIUS_MIN / orbit_radius);
            let orbit_angle = std::f32::consts::TAU * i as f32 / count.max(1) as f32;
            let orbit_phase = self.rng.gen::<f32>() * std::f32::consts::TAU;
            let radius =
                (ORB_RADIUS_MIN + (ORB_RADIUS_MAX - ORB_RADIUS_MIN) * share).max(ORB_RADIUS_MIN);
            let color = record.color.unwrap_or_else(|| palette_color(i));
            let has_logo = record.image_url.is_some();
            if has_logo {
                self.logos.mark_pending(&record.symbol);
            }
            let start = orbit_point(orbit_radius, orbit_angle, orbit_phase, self.elapsed);
            orbs.push(AssetOrb {
                symbol: record.symbol,
                value,
                color,
                has_logo,
                orbit_angle,
                orbit_radius,
                angular_speed,
                orbit_phase,
                radius,
                target: start,
                displayed: start,
                last_depth: f32::NAN,
            });
        }
        self.orbs = orbs;

        self.draw_order.clear();
        if self.selected >= self.orbs.len() {
            self.selected = 0;
        }
        log::info!(
            "[scene] rebuilt {} asset orbs, total value {:.2}",
            self.orbs.len(),
            total
        );
    }
}

/// Sample the time-varying orbit path. The radius breathes with a slow sine
/// so concentric rings never look static; the Y term tilts each path out of
/// the ground plane.
#[inline]
pub(crate) fn orbit_point(radius: f32, angle: f32, phase: f32, elapsed: f32) -> Vec3 {
    let wobble = 1.0 + ORBIT_WOBBLE_RATIO * (elapsed * ORBIT_WOBBLE_RATE + phase).sin();
    let r = radius * wobble;
    Vec3::new(
        angle.cos() * r,
        (angle * 0.7 + phase).sin() * ORBIT_TILT_HEIGHT,
        angle.sin() * r,
    )
}

fn spawn_particles(rng: &mut StdRng, count: usize, bound: f32) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let pos = Vec3::new(
                rng.gen_range(-bound..bound),
                rng.gen_range(-bound..bound),
                rng.gen_range(-bound..bound),
            );
            Particle {
                target: pos,
                displayed: pos,
                velocity: Vec3::new(
                    rng.gen_range(-PARTICLE_DRIFT_MAX..PARTICLE_DRIFT_MAX),
                    rng.gen_range(-PARTICLE_DRIFT_MAX..PARTICLE_DRIFT_MAX),
                    rng.gen_range(-PARTICLE_DRIFT_MAX..PARTICLE_DRIFT_MAX),
                ),
                radius: rng.gen_range(PARTICLE_RADIUS_MIN..PARTICLE_RADIUS_MAX),
                brightness: rng.gen_range(0.25..0.9),
            }
        })
        .collect()
}
