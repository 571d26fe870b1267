//! Pointer-to-surface ray picking.

use crate::camera::Camera;
use crate::scene::{Asset, MaterialId, SurfaceId};
use glam::{Vec2, Vec3, Vec4};
use smallvec::SmallVec;

/// Viewport size in the same pixel space as pointer coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    /// World-space ray from the camera eye through a normalised device
    /// coordinate.
    pub fn from_camera(camera: &Camera, ndc: Vec2) -> Ray {
        let inv = camera.view_projection().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far: Vec3 = p_far.truncate() / p_far.w;
        Ray {
            origin: camera.eye,
            direction: (far - camera.eye).normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One ray/surface intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub point: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
    pub surface: SurfaceId,
    pub material: Option<MaterialId>,
}

/// Pixel coordinates (origin top-left) to NDC in `[-1, 1]`, Y pointing up.
#[inline]
pub fn pointer_to_ndc(pointer: Vec2, viewport: Viewport) -> Vec2 {
    let w = viewport.width.max(1.0);
    let h = viewport.height.max(1.0);
    Vec2::new((pointer.x / w) * 2.0 - 1.0, 1.0 - (pointer.y / h) * 2.0)
}

/// Möller–Trumbore, double-sided. Returns the distance along the ray.
#[inline]
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    // exact test only
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t > 0.0).then_some(t)
}

/// Every intersection of `ray` with the asset's visible surfaces, nearest
/// first.
pub fn intersect_asset(ray: &Ray, asset: &Asset) -> SmallVec<[Hit; 4]> {
    let mut hits: SmallVec<[Hit; 4]> = SmallVec::new();
    for surface in asset.surfaces() {
        if !asset.is_visible(surface) {
            continue;
        }
        let Some(mesh) = asset.mesh(surface.mesh) else {
            continue;
        };
        let world = asset.world_matrix(surface.node);
        if mesh
            .local_bounds
            .transformed(&world)
            .ray_entry(ray.origin, ray.direction)
            .is_none()
        {
            continue;
        }
        for [a, b, c] in mesh.triangles() {
            let (a, b, c) = (
                world.transform_point3(a),
                world.transform_point3(b),
                world.transform_point3(c),
            );
            if let Some(t) = ray_triangle(ray, a, b, c) {
                hits.push(Hit {
                    point: ray.at(t),
                    distance: t,
                    surface,
                    material: mesh.material,
                });
            }
        }
    }
    hits.sort_by(|x, y| x.distance.total_cmp(&y.distance));
    hits
}

/// Resolve a pointer position to the nearest surface under it.
pub fn pick(pointer: Vec2, viewport: Viewport, camera: &Camera, asset: &Asset) -> Option<Hit> {
    let ray = Ray::from_camera(camera, pointer_to_ndc(pointer, viewport));
    if ray.direction == Vec3::ZERO {
        return None;
    }
    intersect_asset(&ray, asset).into_iter().next()
}
