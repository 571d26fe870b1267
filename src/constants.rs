//! Page wiring and render tuning constants for the web front-end.
//!
//! Behavioural defaults (framing, effect timing, counter cooldown) live in
//! `ignite_core::constants`; this file only holds what the browser shell
//! itself needs.

// DOM element ids
pub const CANVAS_ID: &str = "three";
pub const COUNTER_ID: &str = "counter";
pub const CTA_ID: &str = "cta";
pub const STATUS_ID: &str = "status";
pub const TOAST_ID: &str = "toast";
pub const CONFIG_SCRIPT_ID: &str = "viewer-config";

// Backing store never exceeds this many device pixels per CSS pixel
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Floor grid and origin axes drawn under the model
pub const GRID_SIZE: f32 = 10.0;
pub const GRID_DIVISIONS: u32 = 10;
pub const GRID_CENTER_COLOR: u32 = 0x666666;
pub const GRID_COLOR: u32 = 0x333333;
pub const AXES_LENGTH: f32 = 0.25;

// Flame sprite tint (multiplied by the procedural falloff)
pub const FLAME_SPRITE_COLOR: u32 = 0xff9a2e;

// Fallback surface colour for primitives without a material
pub const DEFAULT_SURFACE_GRAY: f32 = 0.8;
