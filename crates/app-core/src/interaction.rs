//! Interaction bridge: classified gestures and desktop pointer input become
//! camera/selection commands on the scene's queue.
//!
//! Every delta is gain-scaled and clamped here, and the scene clamps again
//! when applying — two independent layers between raw input and the
//! projection denominator.

use std::time::Duration;

use glam::Vec2;
use smallvec::SmallVec;

use crate::config::{ConfigError, GestureConfig};
use crate::constants::*;
use crate::gesture::{Gesture, GestureTracker, Hand, HandSkeleton, SwipeDirection};
use crate::scene::{Scene, SceneCommand};

/// Notifications for collaborators (UI feedback, tutorials).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionEvent {
    GestureChanged {
        hand: Hand,
        gesture: Gesture,
        confidence: f32,
    },
    ZoomApplied(f32),
    RotationApplied(Vec2),
    SwipeApplied {
        hand: Hand,
        direction: SwipeDirection,
    },
}

pub struct InteractionBridge {
    left: GestureTracker,
    right: GestureTracker,
    last_gesture: [Gesture; 2],
}

impl InteractionBridge {
    pub fn new(config: GestureConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            left: GestureTracker::new(config.clone())?,
            right: GestureTracker::new(config)?,
            last_gesture: [Gesture::None; 2],
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            left: GestureTracker::with_defaults(),
            right: GestureTracker::with_defaults(),
            last_gesture: [Gesture::None; 2],
        }
    }

    pub fn history(&self, hand: Hand) -> &[(Gesture, f32)] {
        match hand {
            Hand::Left => self.left.history(),
            Hand::Right => self.right.history(),
        }
    }

    /// Classify one hand's snapshot for this frame and queue the resulting
    /// commands. Call once per tracked hand per frame, before
    /// `Scene::advance`.
    pub fn ingest_hand(
        &mut self,
        scene: &mut Scene,
        hand: Hand,
        skeleton: Option<&HandSkeleton>,
        now: Duration,
    ) -> SmallVec<[InteractionEvent; 4]> {
        let tracker = match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        };
        let frame = tracker.update(skeleton, now);

        let mut events = SmallVec::new();
        let slot = match hand {
            Hand::Left => 0,
            Hand::Right => 1,
        };
        if frame.gesture != self.last_gesture[slot] {
            self.last_gesture[slot] = frame.gesture;
            events.push(InteractionEvent::GestureChanged {
                hand,
                gesture: frame.gesture,
                confidence: frame.confidence,
            });
        }

        match frame.gesture {
            Gesture::Pinch => {
                let factor = frame.zoom_factor.clamp(ZOOM_FACTOR_MIN, ZOOM_FACTOR_MAX);
                if (factor - 1.0).abs() > f32::EPSILON {
                    scene.queue(SceneCommand::ZoomFactor(factor));
                    events.push(InteractionEvent::ZoomApplied(factor));
                }
            }
            Gesture::Grab => {
                if frame.rotate_delta.length_squared() > 0.0 {
                    // Wrist x drives yaw; wrist y drives pitch, inverted so
                    // raising the hand tilts the scene up.
                    let delta = Vec2::new(
                        frame.rotate_delta.x * GESTURE_ROTATE_GAIN,
                        -frame.rotate_delta.y * GESTURE_ROTATE_GAIN,
                    );
                    scene.queue(SceneCommand::Rotate(delta));
                    events.push(InteractionEvent::RotationApplied(delta));
                }
            }
            Gesture::Swipe(direction) => {
                match direction {
                    SwipeDirection::Left => scene.queue(SceneCommand::SelectOffset(-1)),
                    SwipeDirection::Right => scene.queue(SceneCommand::SelectOffset(1)),
                    SwipeDirection::Up => scene.queue(SceneCommand::ZoomStep(ZOOM_STEP)),
                    SwipeDirection::Down => scene.queue(SceneCommand::ZoomStep(-ZOOM_STEP)),
                }
                events.push(InteractionEvent::SwipeApplied { hand, direction });
            }
            Gesture::Point | Gesture::Open | Gesture::None => {}
        }
        events
    }

    /// Desktop fallback: pointer drag in pixels maps to rotation with the
    /// same clamping path as the gesture route.
    pub fn pointer_drag(&mut self, scene: &mut Scene, delta_px: Vec2) {
        let delta = delta_px * POINTER_ROTATE_GAIN;
        if delta.length_squared() > 0.0 {
            scene.queue(SceneCommand::Rotate(delta));
        }
    }

    /// Desktop fallback: wheel scroll maps to multiplicative zoom. Positive
    /// delta (scroll down) zooms out.
    pub fn wheel_zoom(&mut self, scene: &mut Scene, delta: f32) {
        if !delta.is_finite() || delta == 0.0 {
            return;
        }
        let factor = (1.0 - delta * WHEEL_ZOOM_GAIN).clamp(ZOOM_FACTOR_MIN, ZOOM_FACTOR_MAX);
        scene.queue(SceneCommand::ZoomFactor(factor));
    }
}
