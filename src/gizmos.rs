//! Line geometry for the scene helpers: floor grid, origin axes and the
//! framed bounding box. Pure data, uploaded by `render::lines`.

use glam::Vec3;
use ignite_core::bounds::Aabb;
use ignite_core::constants::rgb_hex;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    #[inline]
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// Square grid on the XZ plane, `size` wide with `divisions` cells per side.
/// The two lines through the origin use `center_color`.
pub fn grid_lines(size: f32, divisions: u32, center_color: u32, grid_color: u32) -> Vec<LineVertex> {
    let divisions = divisions.max(1);
    let half = size * 0.5;
    let step = size / divisions as f32;
    let center = rgb_hex(center_color);
    let grid = rgb_hex(grid_color);
    let mut out = Vec::with_capacity((divisions as usize + 1) * 4);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if i == divisions / 2 { center } else { grid };
        out.push(LineVertex::new(Vec3::new(-half, 0.0, k), color));
        out.push(LineVertex::new(Vec3::new(half, 0.0, k), color));
        out.push(LineVertex::new(Vec3::new(k, 0.0, -half), color));
        out.push(LineVertex::new(Vec3::new(k, 0.0, half), color));
    }
    out
}

/// X, Y and Z axes from the origin in red, green and blue.
pub fn axes_lines(length: f32) -> Vec<LineVertex> {
    [Vec3::X, Vec3::Y, Vec3::Z]
        .into_iter()
        .flat_map(|axis| {
            [
                LineVertex::new(Vec3::ZERO, axis),
                LineVertex::new(axis * length, axis),
            ]
        })
        .collect()
}

/// Twelve edges of `bounds`; empty for an empty box.
pub fn box_lines(bounds: &Aabb, color: u32) -> Vec<LineVertex> {
    if bounds.is_empty() {
        return Vec::new();
    }
    let corners = bounds.corners();
    let color = rgb_hex(color);
    Aabb::EDGES
        .iter()
        .flat_map(|&(a, b)| {
            [
                LineVertex::new(corners[a], color),
                LineVertex::new(corners[b], color),
            ]
        })
        .collect()
}
