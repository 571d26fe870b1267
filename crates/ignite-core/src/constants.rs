use glam::{Vec2, Vec3};

// Shared framing/effect tuning constants used by the web frontend and tests.

// Framing
pub const TARGET_FILL_RATIO: f32 = 0.8; // largest asset dimension after normalisation
pub const CAMERA_PADDING: f32 = 1.6; // multiplier on the fit distance
pub const VIEW_DIRECTION: Vec3 = Vec3::new(1.0, 0.6, 1.0); // diagonal the camera backs off along

// Camera defaults
pub const CAMERA_FOV_DEG: f32 = 50.0;
pub const CAMERA_NEAR: f32 = 0.01;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_START_EYE: Vec3 = Vec3::new(1.8, 1.2, 2.2);

// Orbit controls
pub const ORBIT_DAMPING: f32 = 0.05; // fraction of pending motion applied per frame
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_ZOOM_STEP: f32 = 0.95; // distance factor per wheel notch
pub const ORBIT_MIN_DISTANCE: f32 = 0.05;
pub const ORBIT_MAX_DISTANCE: f32 = 50.0;

// Ignite effect
pub const EFFECT_LIFE_MS: f64 = 1500.0;
pub const HIGHLIGHT_EMISSIVE_INTENSITY: f32 = 2.0;
pub const HIGHLIGHT_EMISSIVE_COLOR: u32 = 0xffa000;
pub const FLAME_BASE_SCALE: Vec2 = Vec2::new(0.06, 0.12);
pub const FLAME_PULSE_AMPLITUDE: f32 = 0.1; // relative scale wobble
pub const FLAME_PULSE_RATE: f64 = 0.02; // radians per millisecond
pub const MATCH_LIGHT_COLOR: u32 = 0xffc46b;
pub const MATCH_LIGHT_INTENSITY: f32 = 1.3;
pub const MATCH_LIGHT_FLOOR: f32 = 0.4; // intensity ratio reached at the end of the effect
pub const MATCH_LIGHT_RANGE: f32 = 0.25;
pub const MATCH_LIGHT_DECAY: f32 = 2.0;
pub const COMPANION_NODE_NAME: &str = "flame";

// Scene lighting
pub const BACKGROUND_COLOR: u32 = 0x0b0b0b;
pub const AMBIENT_INTENSITY: f32 = 0.9;
pub const SUN_INTENSITY: f32 = 1.1;
pub const SUN_POSITION: Vec3 = Vec3::new(2.5, 3.5, 2.5);
pub const BOUNDS_HELPER_COLOR: u32 = 0x44aa88;

// Counter
pub const COUNTER_COOLDOWN_MS: f64 = 10_000.0;
pub const COUNTER_STORAGE_KEY: &str = "manifestation_count";
pub const TOAST_DURATION_MS: f64 = 2500.0;

/// Convert a packed `0xRRGGBB` colour into linear-ish `[0, 1]` components.
#[inline]
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}
