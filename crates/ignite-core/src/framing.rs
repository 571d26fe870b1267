//! Auto-framing: normalise an arbitrary-sized asset and back the camera off
//! far enough that all of it is visible.

use crate::bounds::Aabb;
use crate::camera::Camera;
use crate::constants::{CAMERA_PADDING, TARGET_FILL_RATIO, VIEW_DIRECTION};
use crate::scene::{Asset, RootTransform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingParams {
    /// Largest asset dimension after normalisation, in world units.
    pub fill_ratio: f32,
    /// Multiplier applied to the fit distance.
    pub padding: f32,
    /// Direction the camera is placed along, normalised at use.
    pub view_direction: Vec3,
}

impl Default for FramingParams {
    fn default() -> Self {
        Self {
            fill_ratio: TARGET_FILL_RATIO,
            padding: CAMERA_PADDING,
            view_direction: VIEW_DIRECTION,
        }
    }
}

/// Summary of a successful framing pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Framing {
    /// Uniform scale applied to the asset.
    pub scale: f32,
    /// Pre-framing world-space centre.
    pub center: Vec3,
    /// Pre-framing world-space extents.
    pub size: Vec3,
    /// Camera distance from the origin.
    pub distance: f32,
    /// Post-framing bounds, centred on the origin.
    pub bounds: Aabb,
}

/// Scale and centre `asset` at the origin, then place `camera` so the whole
/// asset fits the viewport.
///
/// Returns `None` without touching either argument when the asset has no
/// measurable extent (empty, flat-to-a-point or non-finite).
pub fn frame(asset: &mut Asset, camera: &mut Camera, params: &FramingParams) -> Option<Framing> {
    asset.update_world_transforms();
    let bounds = asset.world_bounds();
    let size = bounds.size();
    let center = bounds.center();
    let max_dim = bounds.max_dim();
    if !max_dim.is_finite() || max_dim <= 0.0 || !center.is_finite() {
        log::debug!("[framing] skipped: degenerate bounds {:?}", bounds);
        return None;
    }
    let fill = params.fill_ratio;
    let padding = params.padding;
    let direction = params.view_direction.try_normalize()?;
    if !(fill.is_finite() && fill > 0.0 && padding.is_finite() && padding > 0.0) {
        log::warn!("[framing] skipped: invalid params {:?}", params);
        return None;
    }

    let scale = fill / max_dim;
    let current = asset.transform();
    asset.set_transform(RootTransform {
        scale: current.scale * scale,
        translation: (current.translation - center) * scale,
    });

    let half_fov_tan = (camera.fovy_radians * 0.5).tan();
    let dist_h = (size.y * scale) / (2.0 * half_fov_tan);
    let dist_w = (size.x * scale) / (2.0 * half_fov_tan) / camera.aspect;
    let distance = dist_h.max(dist_w);
    camera.look_at(direction * distance * padding, Vec3::ZERO);

    let framed = Framing {
        scale,
        center,
        size,
        distance,
        bounds: asset.world_bounds(),
    };
    log::info!(
        "[framing] size=({:.3},{:.3},{:.3}) scale={:.4} distance={:.3}",
        size.x,
        size.y,
        size.z,
        scale,
        distance
    );
    Some(framed)
}
