// Bridge tests: gestures and desktop input must land on the camera and
// selection only through clamped paths.

use std::time::Duration;

use app_core::{
    AssetRecord, Gesture, Hand, HandSkeleton, InteractionBridge, InteractionEvent, JointPose,
    Scene, SceneCommand, SwipeDirection, Viewport, VisualTuning, JOINT_COUNT, NOMINAL_FRAME_SEC,
    ZOOM_MAX, ZOOM_MIN,
};
use glam::Vec3;

fn frame() -> Duration {
    Duration::from_secs_f32(NOMINAL_FRAME_SEC)
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn scene_with_assets(count: usize) -> Scene {
    let mut scene = Scene::new(VisualTuning::default(), Viewport::new(1280.0, 720.0), 5)
        .expect("default tuning is valid");
    let records = (0..count)
        .map(|i| AssetRecord::new(format!("AS{i}"), (i + 1) as f64))
        .collect();
    scene.queue(SceneCommand::ReplaceAssets(records));
    scene.advance(frame());
    scene
}

fn pose(position: Vec3) -> JointPose {
    JointPose {
        position,
        radius: 0.008,
    }
}

fn skeleton(
    wrist: Vec3,
    thumb: Vec3,
    index: Vec3,
    middle: Vec3,
    ring: Vec3,
    little: Vec3,
) -> HandSkeleton {
    let mut joints = [pose(wrist); JOINT_COUNT];
    let fingers: [(usize, usize, Vec3); 5] = [
        (1, 4, thumb),
        (5, 9, index),
        (10, 14, middle),
        (15, 19, ring),
        (20, 24, little),
    ];
    for (start, end, tip) in fingers {
        let segments = (end - start + 1) as f32;
        for (k, idx) in (start..=end).enumerate() {
            let t = (k + 1) as f32 / segments;
            joints[idx] = pose(wrist + (tip - wrist) * t);
        }
    }
    HandSkeleton::from_joints(joints)
}

fn open_hand_at(offset: Vec3) -> HandSkeleton {
    skeleton(
        offset,
        offset + Vec3::new(0.12, 0.08, 0.0),
        offset + Vec3::new(0.0, 0.17, 0.0),
        offset + Vec3::new(0.03, 0.17, 0.0),
        offset + Vec3::new(0.06, 0.16, 0.0),
        offset + Vec3::new(0.09, 0.15, 0.0),
    )
}

fn fist_at(offset: Vec3) -> HandSkeleton {
    skeleton(
        offset,
        offset + Vec3::new(0.0, -0.06, 0.0),
        offset + Vec3::new(0.05, 0.03, 0.0),
        offset + Vec3::new(0.04, 0.04, 0.0),
        offset + Vec3::new(0.03, 0.045, 0.0),
        offset + Vec3::new(0.02, 0.05, 0.0),
    )
}

fn pinch_hand(gap: f32) -> HandSkeleton {
    skeleton(
        Vec3::ZERO,
        Vec3::new(0.10, 0.0, 0.0),
        Vec3::new(0.10 + gap, 0.0, 0.0),
        Vec3::new(0.0, 0.17, 0.0),
        Vec3::new(0.03, 0.17, 0.0),
        Vec3::new(0.06, 0.16, 0.0),
    )
}

#[test]
fn swipe_right_advances_selection() {
    let mut scene = scene_with_assets(3);
    let mut bridge = InteractionBridge::with_defaults();

    bridge.ingest_hand(&mut scene, Hand::Right, Some(&open_hand_at(Vec3::ZERO)), ms(0));
    let events = bridge.ingest_hand(
        &mut scene,
        Hand::Right,
        Some(&open_hand_at(Vec3::new(0.15, 0.0, 0.0))),
        ms(200),
    );
    assert!(events.contains(&InteractionEvent::SwipeApplied {
        hand: Hand::Right,
        direction: SwipeDirection::Right,
    }));
    scene.advance(frame());
    assert_eq!(scene.selected(), 1);
}

#[test]
fn swipe_left_retreats_selection_with_wrap() {
    let mut scene = scene_with_assets(3);
    let mut bridge = InteractionBridge::with_defaults();

    bridge.ingest_hand(&mut scene, Hand::Left, Some(&open_hand_at(Vec3::ZERO)), ms(0));
    bridge.ingest_hand(
        &mut scene,
        Hand::Left,
        Some(&open_hand_at(Vec3::new(-0.15, 0.0, 0.0))),
        ms(200),
    );
    scene.advance(frame());
    assert_eq!(scene.selected(), 2);
}

#[test]
fn vertical_swipes_step_zoom_within_range() {
    let mut scene = scene_with_assets(2);
    let mut bridge = InteractionBridge::with_defaults();

    bridge.ingest_hand(&mut scene, Hand::Right, Some(&open_hand_at(Vec3::ZERO)), ms(0));
    bridge.ingest_hand(
        &mut scene,
        Hand::Right,
        Some(&open_hand_at(Vec3::new(0.0, 0.18, 0.0))),
        ms(200),
    );
    scene.advance(frame());
    assert!(scene.camera().zoom() > 1.0);

    // Hammering swipe-up forever still cannot leave the zoom range. The
    // iterations are spaced past the swipe window so the return stroke
    // expires instead of registering as a swipe-down.
    for i in 0..100u64 {
        let t0 = 1000 + i * 900;
        bridge.ingest_hand(&mut scene, Hand::Right, Some(&open_hand_at(Vec3::ZERO)), ms(t0));
        bridge.ingest_hand(
            &mut scene,
            Hand::Right,
            Some(&open_hand_at(Vec3::new(0.0, 0.18, 0.0))),
            ms(t0 + 200),
        );
        scene.advance(frame());
    }
    assert!(scene.camera().zoom() <= ZOOM_MAX);
}

#[test]
fn sustained_pinch_zooms_the_camera() {
    let mut scene = scene_with_assets(2);
    let mut bridge = InteractionBridge::with_defaults();

    bridge.ingest_hand(&mut scene, Hand::Right, Some(&pinch_hand(0.020)), ms(0));
    scene.advance(frame());
    let before = scene.camera().zoom();

    let events = bridge.ingest_hand(&mut scene, Hand::Right, Some(&pinch_hand(0.010)), ms(16));
    assert!(events
        .iter()
        .any(|e| matches!(e, InteractionEvent::ZoomApplied(f) if *f > 1.0)));
    scene.advance(frame());
    assert!(scene.camera().zoom() > before);
}

#[test]
fn grab_travel_rotates_the_camera() {
    let mut scene = scene_with_assets(2);
    let mut bridge = InteractionBridge::with_defaults();

    bridge.ingest_hand(&mut scene, Hand::Right, Some(&fist_at(Vec3::ZERO)), ms(0));
    scene.advance(frame());
    assert_eq!(scene.camera().yaw, 0.0);

    let events = bridge.ingest_hand(
        &mut scene,
        Hand::Right,
        Some(&fist_at(Vec3::new(0.05, 0.0, 0.0))),
        ms(16),
    );
    assert!(events
        .iter()
        .any(|e| matches!(e, InteractionEvent::RotationApplied(_))));
    scene.advance(frame());
    assert!(scene.camera().yaw > 0.0);
}

#[test]
fn gesture_change_events_fire_once_per_transition() {
    let mut scene = scene_with_assets(1);
    let mut bridge = InteractionBridge::with_defaults();

    let first = bridge.ingest_hand(&mut scene, Hand::Left, Some(&fist_at(Vec3::ZERO)), ms(0));
    assert!(first.iter().any(|e| matches!(
        e,
        InteractionEvent::GestureChanged {
            gesture: Gesture::Grab,
            ..
        }
    )));
    let second = bridge.ingest_hand(&mut scene, Hand::Left, Some(&fist_at(Vec3::ZERO)), ms(16));
    assert!(!second
        .iter()
        .any(|e| matches!(e, InteractionEvent::GestureChanged { .. })));
}

#[test]
fn hands_track_independently() {
    let mut scene = scene_with_assets(1);
    let mut bridge = InteractionBridge::with_defaults();

    bridge.ingest_hand(&mut scene, Hand::Left, Some(&fist_at(Vec3::ZERO)), ms(0));
    let right = bridge.ingest_hand(&mut scene, Hand::Right, None, ms(0));
    // The untracked right hand must not inherit the left hand's state.
    assert!(right.is_empty());
    assert!(bridge.history(Hand::Right).is_empty());
    assert_eq!(bridge.history(Hand::Left).len(), 1);
}

#[test]
fn hostile_zoom_commands_cannot_break_projection() {
    let mut scene = scene_with_assets(2);
    scene.queue(SceneCommand::ZoomFactor(f32::NAN));
    scene.queue(SceneCommand::ZoomFactor(f32::INFINITY));
    scene.queue(SceneCommand::ZoomFactor(-3.0));
    scene.queue(SceneCommand::ZoomStep(f32::NAN));
    scene.queue(SceneCommand::ZoomStep(1e9));
    scene.advance(frame());

    let zoom = scene.camera().zoom();
    assert!(zoom.is_finite());
    assert!((ZOOM_MIN..=ZOOM_MAX).contains(&zoom));
}

#[test]
fn pointer_fallback_matches_gesture_clamps() {
    let mut scene = scene_with_assets(2);
    let mut bridge = InteractionBridge::with_defaults();

    bridge.pointer_drag(&mut scene, glam::Vec2::new(120.0, -40.0));
    bridge.wheel_zoom(&mut scene, -240.0);
    scene.advance(frame());
    assert!(scene.camera().yaw != 0.0);
    assert!(scene.camera().zoom() > 1.0);

    // A pathological wheel burst stays inside the zoom range.
    for _ in 0..200 {
        bridge.wheel_zoom(&mut scene, -10_000.0);
    }
    scene.advance(frame());
    assert!(scene.camera().zoom() <= ZOOM_MAX);

    bridge.wheel_zoom(&mut scene, f32::NAN);
    scene.advance(frame());
    assert!(scene.camera().zoom().is_finite());
}
