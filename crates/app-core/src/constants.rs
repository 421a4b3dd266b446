/// Scene, projection and interaction tuning constants.
///
/// These constants express intended behavior (time constants, clamp limits)
/// and keep magic numbers out of the code. Anything a caller may reasonably
/// want to vary per scene instance lives in `config.rs` instead; the values
/// here are the defaults those configs start from.

// Projection
pub const FOCAL_LENGTH: f32 = 800.0;
pub const SCALE_MIN: f32 = 0.01; // also used for behind-camera points
pub const SCALE_MAX: f32 = 4.0;

// Camera
pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 5.0;
pub const PITCH_LIMIT: f32 = 1.45; // radians, keeps the scene from flipping over

// Interaction gains and per-frame clamps
pub const ZOOM_STEP: f32 = 0.25; // discrete step for swipe up/down
pub const ZOOM_FACTOR_MIN: f32 = 0.5; // largest single-frame zoom-out multiplier
pub const ZOOM_FACTOR_MAX: f32 = 2.0; // largest single-frame zoom-in multiplier
pub const GESTURE_ROTATE_GAIN: f32 = 3.2; // radians per meter of wrist travel
pub const POINTER_ROTATE_GAIN: f32 = 0.005; // radians per dragged pixel
pub const WHEEL_ZOOM_GAIN: f32 = 0.001; // zoom multiplier per scroll unit

// Frame timing
pub const NOMINAL_FRAME_SEC: f32 = 1.0 / 60.0;
pub const DELTA_CLAMP_FRAMES: f32 = 3.0; // cap after tab-suspend / GC stalls

// Smoothing (per nominal frame)
pub const POSITION_BLEND: f32 = 0.12;

// Ambient particles
pub const PARTICLE_COUNT: usize = 150;
pub const PARTICLE_BOUND: f32 = 900.0; // cubic half-extent
pub const PARTICLE_DRIFT_MAX: f32 = 22.0; // units per second, per axis
pub const PARTICLE_RADIUS_MIN: f32 = 1.0;
pub const PARTICLE_RADIUS_MAX: f32 = 3.5;

// Asset orbs
pub const ORBIT_RADIUS_MIN: f32 = 130.0;
pub const ORBIT_RADIUS_SPAN: f32 = 260.0;
pub const ORBIT_SPEED_BASE: f32 = 0.35; // radians per second, innermost orbit
pub const ORBIT_WOBBLE_RATIO: f32 = 0.06; // slow radial breathing of each ring
pub const ORBIT_WOBBLE_RATE: f32 = 0.4; // radians per second
pub const ORBIT_TILT_HEIGHT: f32 = 46.0; // vertical excursion of the orbit path
pub const ORB_RADIUS_MIN: f32 = 7.0;
pub const ORB_RADIUS_MAX: f32 = 44.0;

// Central aggregate orb
pub const CENTER_ORB_RADIUS: f32 = 62.0;
pub const CENTER_RING_COUNT: usize = 3;
pub const CENTER_PULSE_RATE: f32 = 1.3; // radians per second
pub const CENTER_RING_SPACING: f32 = 14.0;

// Depth sorting
pub const DEPTH_HYSTERESIS: f32 = 2.5; // scene units a depth must move to re-sort

// Gesture thresholds (meters, tracked-hand space)
pub const PINCH_DISTANCE_M: f32 = 0.025;
pub const GRAB_CURL_DISTANCE_M: f32 = 0.10;
pub const FINGER_EXTENDED_M: f32 = 0.13;
pub const SWIPE_MIN_DISTANCE_M: f32 = 0.12;
pub const SWIPE_WINDOW_MIN_MS: u64 = 50;
pub const SWIPE_WINDOW_MAX_MS: u64 = 500;
pub const PINCH_ZOOM_GAIN: f32 = 8.0; // zoom multiplier change per meter of pinch travel
pub const GESTURE_HISTORY_LEN: usize = 16;

// Draw list
pub const CONNECTOR_DOT_SPACING: f32 = 14.0; // pixel gap between dots on flattened lines
pub const GLOW_ALPHA: f32 = 0.22;
