//! Hand-skeleton gesture classification.
//!
//! Each tracked hand delivers a fresh 25-joint snapshot every frame; the
//! classifier reduces it to one dominant gesture plus the continuous signals
//! interaction needs (pinch travel for zoom, wrist travel for rotation,
//! windowed wrist displacement for swipes). The only state that survives a
//! frame is the previous pinch distance, the previous wrist position, and
//! the swipe anchor — everything else is recomputed from the snapshot, so
//! classification is a pure function of the input plus that named state.

use std::time::Duration;

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::config::{ConfigError, GestureConfig};
use crate::constants::GESTURE_HISTORY_LEN;

pub const JOINT_COUNT: usize = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

/// Joint order follows the WebXR hand-input module: wrist, four thumb
/// joints, then five joints for each remaining finger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum HandJoint {
    Wrist = 0,
    ThumbMetacarpal = 1,
    ThumbPhalanxProximal = 2,
    ThumbPhalanxDistal = 3,
    ThumbTip = 4,
    IndexMetacarpal = 5,
    IndexPhalanxProximal = 6,
    IndexPhalanxIntermediate = 7,
    IndexPhalanxDistal = 8,
    IndexTip = 9,
    MiddleMetacarpal = 10,
    MiddlePhalanxProximal = 11,
    MiddlePhalanxIntermediate = 12,
    MiddlePhalanxDistal = 13,
    MiddleTip = 14,
    RingMetacarpal = 15,
    RingPhalanxProximal = 16,
    RingPhalanxIntermediate = 17,
    RingPhalanxDistal = 18,
    RingTip = 19,
    LittleMetacarpal = 20,
    LittlePhalanxProximal = 21,
    LittlePhalanxIntermediate = 22,
    LittlePhalanxDistal = 23,
    LittleTip = 24,
}

impl HandJoint {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The four non-thumb fingertips, in finger order.
    pub const FINGERTIPS: [HandJoint; 4] = [
        HandJoint::IndexTip,
        HandJoint::MiddleTip,
        HandJoint::RingTip,
        HandJoint::LittleTip,
    ];
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JointPose {
    pub position: Vec3,
    pub radius: f32,
}

/// One hand's pose for one frame.
#[derive(Clone, Debug)]
pub struct HandSkeleton {
    joints: [JointPose; JOINT_COUNT],
}

impl HandSkeleton {
    pub fn from_joints(joints: [JointPose; JOINT_COUNT]) -> Self {
        Self { joints }
    }

    /// Build from a runtime-sized slice; anything but exactly 25 joints is
    /// malformed input and yields `None` (the hand counts as untracked).
    pub fn from_slice(poses: &[JointPose]) -> Option<Self> {
        let joints: [JointPose; JOINT_COUNT] = poses.try_into().ok()?;
        Some(Self { joints })
    }

    #[inline]
    pub fn joint(&self, joint: HandJoint) -> &JointPose {
        &self.joints[joint.index()]
    }

    pub fn joints(&self) -> &[JointPose; JOINT_COUNT] {
        &self.joints
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    None,
    Pinch,
    Grab,
    Point,
    Open,
    Swipe(SwipeDirection),
}

/// Per-frame classification result plus continuous control signals.
#[derive(Clone, Copy, Debug)]
pub struct GestureFrame {
    pub gesture: Gesture,
    pub confidence: f32,
    /// Zoom multiplier from sustained pinch travel; 1.0 when inactive or on
    /// the first pinched frame (no previous distance yet).
    pub zoom_factor: f32,
    /// Wrist (x, y) travel in meters while grabbing; zero otherwise.
    pub rotate_delta: Vec2,
}

impl GestureFrame {
    #[inline]
    pub fn idle() -> Self {
        Self {
            gesture: Gesture::None,
            confidence: 0.0,
            zoom_factor: 1.0,
            rotate_delta: Vec2::ZERO,
        }
    }
}

/// Per-hand classifier state.
pub struct GestureTracker {
    config: GestureConfig,
    prev_pinch_distance: Option<f32>,
    prev_wrist: Option<Vec3>,
    swipe_anchor: Option<(Vec3, Duration)>,
    history: SmallVec<[(Gesture, f32); GESTURE_HISTORY_LEN]>,
}

impl GestureTracker {
    pub fn new(config: GestureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            prev_pinch_distance: None,
            prev_wrist: None,
            swipe_anchor: None,
            history: SmallVec::new(),
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: GestureConfig::default(),
            prev_pinch_distance: None,
            prev_wrist: None,
            swipe_anchor: None,
            history: SmallVec::new(),
        }
    }

    /// Recent gesture transitions, oldest first. Observability only.
    pub fn history(&self) -> &[(Gesture, f32)] {
        &self.history
    }

    /// Classify one frame. `now` is any monotonically increasing clock (the
    /// scene's frame clock, or virtual time in tests); `None` means the hand
    /// is not tracked this frame.
    pub fn update(&mut self, skeleton: Option<&HandSkeleton>, now: Duration) -> GestureFrame {
        let skel = match skeleton {
            Some(s) => s,
            None => {
                self.clear_frame_state();
                return GestureFrame::idle();
            }
        };

        let wrist = skel.joint(HandJoint::Wrist).position;
        let pinch_distance = skel
            .joint(HandJoint::ThumbTip)
            .position
            .distance(skel.joint(HandJoint::IndexTip).position);
        let tip_reach: [f32; 4] = HandJoint::FINGERTIPS
            .map(|tip| skel.joint(tip).position.distance(wrist));
        let thumb_reach = skel.joint(HandJoint::ThumbTip).position.distance(wrist);

        // Swipe anchoring runs every tracked frame regardless of which
        // detector ultimately wins, so a pinch frame cannot stall the window.
        let swipe = self.track_swipe(wrist, now);

        let mut frame = GestureFrame::idle();
        let cfg = &self.config;

        if pinch_distance < cfg.pinch_distance {
            frame.gesture = Gesture::Pinch;
            frame.confidence = (1.0 - pinch_distance / cfg.pinch_distance).clamp(0.0, 1.0);
            if let Some(prev) = self.prev_pinch_distance {
                // Fingers closing -> factor above 1 (zoom in), opening ->
                // below 1. The bridge clamps before applying.
                frame.zoom_factor =
                    (1.0 + (prev - pinch_distance) * cfg.pinch_zoom_gain).max(0.1);
            }
            self.prev_pinch_distance = Some(pinch_distance);
        } else {
            self.prev_pinch_distance = None;
        }

        if frame.gesture == Gesture::None
            && tip_reach.iter().all(|d| *d < cfg.grab_curl_distance)
        {
            frame.gesture = Gesture::Grab;
            frame.confidence = 0.85;
            if let Some(prev) = self.prev_wrist {
                frame.rotate_delta = Vec2::new(wrist.x - prev.x, wrist.y - prev.y);
            }
        }

        if frame.gesture == Gesture::None {
            if let Some(direction) = swipe {
                frame.gesture = Gesture::Swipe(direction);
                frame.confidence = 0.9;
            }
        }

        if frame.gesture == Gesture::None {
            let index_extended = tip_reach[0] > cfg.finger_extended_distance;
            let others_curled = tip_reach[1..]
                .iter()
                .all(|d| *d < cfg.grab_curl_distance);
            if index_extended && others_curled {
                frame.gesture = Gesture::Point;
                frame.confidence = 0.8;
            }
        }

        if frame.gesture == Gesture::None
            && thumb_reach > cfg.finger_extended_distance
            && tip_reach.iter().all(|d| *d > cfg.finger_extended_distance)
        {
            frame.gesture = Gesture::Open;
            frame.confidence = 0.8;
        }

        self.prev_wrist = Some(wrist);
        self.record(frame);
        frame
    }

    /// Cross-frame state dies with tracking loss; the next tracked frame is
    /// first-frame-safe (no deltas).
    fn clear_frame_state(&mut self) {
        self.prev_pinch_distance = None;
        self.prev_wrist = None;
        self.swipe_anchor = None;
    }

    fn track_swipe(&mut self, wrist: Vec3, now: Duration) -> Option<SwipeDirection> {
        let (anchor, t0) = match self.swipe_anchor {
            Some(a) => a,
            None => {
                self.swipe_anchor = Some((wrist, now));
                return None;
            }
        };
        let elapsed = now.saturating_sub(t0);
        if elapsed > self.config.swipe_window_max {
            // Too slow: drift, not a swipe. Start a fresh window here.
            self.swipe_anchor = Some((wrist, now));
            return None;
        }
        let displacement = wrist - anchor;
        if elapsed >= self.config.swipe_window_min
            && displacement.length() >= self.config.swipe_min_distance
        {
            self.swipe_anchor = Some((wrist, now));
            let direction = if displacement.x.abs() >= displacement.y.abs() {
                if displacement.x >= 0.0 {
                    SwipeDirection::Right
                } else {
                    SwipeDirection::Left
                }
            } else if displacement.y >= 0.0 {
                SwipeDirection::Up
            } else {
                SwipeDirection::Down
            };
            return Some(direction);
        }
        None
    }

    fn record(&mut self, frame: GestureFrame) {
        let changed = self
            .history
            .last()
            .map(|(g, _)| *g != frame.gesture)
            .unwrap_or(frame.gesture != Gesture::None);
        if changed {
            log::debug!(
                "[gesture] {:?} (confidence {:.2})",
                frame.gesture,
                frame.confidence
            );
            if self.history.len() == GESTURE_HISTORY_LEN {
                self.history.remove(0);
            }
            self.history.push((frame.gesture, frame.confidence));
        }
    }
}
