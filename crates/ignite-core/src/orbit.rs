//! Damped orbit/zoom/pan camera controller.
//!
//! Input adds to pending deltas; `update` applies a `damping` fraction of
//! them per frame and decays the rest, giving the usual inertial feel.

use crate::camera::Camera;
use crate::constants::{
    ORBIT_DAMPING, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, ORBIT_ROTATE_SPEED, ORBIT_ZOOM_STEP,
};
use crate::pick::Viewport;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

const PHI_EPS: f32 = 1e-4;
const SETTLE_EPS: f32 = 1e-5;

#[derive(Clone, Debug)]
pub struct OrbitController {
    target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
    pending_pan: Vec3,
    pub damping: f32,
    pub rotate_speed: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 1.0,
            theta: 0.0,
            phi: PI * 0.5,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
            pending_pan: Vec3::ZERO,
            damping: ORBIT_DAMPING,
            rotate_speed: ORBIT_ROTATE_SPEED,
        }
    }
}

impl OrbitController {
    pub fn from_camera(camera: &Camera) -> Self {
        let mut c = Self::default();
        c.sync_from_camera(camera);
        c
    }

    /// Adopt the camera's current placement and drop pending motion.
    pub fn sync_from_camera(&mut self, camera: &Camera) {
        let offset = camera.eye - camera.target;
        self.target = camera.target;
        self.radius = offset.length().max(ORBIT_MIN_DISTANCE);
        self.theta = offset.x.atan2(offset.z);
        self.phi = (offset.y / self.radius).clamp(-1.0, 1.0).acos();
        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
        self.pending_scale = 1.0;
        self.pending_pan = Vec3::ZERO;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Drag by `delta` pixels; a full viewport height is one turn.
    pub fn rotate(&mut self, delta: Vec2, viewport: Viewport) {
        let h = viewport.height.max(1.0);
        self.pending_theta -= TAU * delta.x / h * self.rotate_speed;
        self.pending_phi -= TAU * delta.y / h * self.rotate_speed;
    }

    /// Wheel zoom; positive `delta_y` moves away from the target.
    pub fn zoom(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.pending_scale /= ORBIT_ZOOM_STEP;
        } else if delta_y < 0.0 {
            self.pending_scale *= ORBIT_ZOOM_STEP;
        }
    }

    /// Shift-drag pan so the point under the cursor follows it.
    pub fn pan(&mut self, delta: Vec2, viewport: Viewport, camera: &Camera) {
        let h = viewport.height.max(1.0);
        let distance = (camera.eye - self.target).length() * (camera.fovy_radians * 0.5).tan();
        let (right, up) = camera.billboard_axes();
        self.pending_pan += right * (-2.0 * delta.x * distance / h);
        self.pending_pan += up * (2.0 * delta.y * distance / h);
    }

    /// Apply one frame of damped motion to `camera`. Returns true while the
    /// camera is still moving.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let d = self.damping.clamp(0.0, 1.0);
        self.theta += self.pending_theta * d;
        self.phi = (self.phi + self.pending_phi * d).clamp(PHI_EPS, PI - PHI_EPS);
        self.radius =
            (self.radius * self.pending_scale).clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
        self.target += self.pending_pan * d;

        self.pending_theta *= 1.0 - d;
        self.pending_phi *= 1.0 - d;
        self.pending_pan *= 1.0 - d;
        let zoomed = (self.pending_scale - 1.0).abs() > SETTLE_EPS;
        self.pending_scale = 1.0;

        let sin_phi = self.phi.sin();
        let offset = Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        );
        camera.look_at(self.target + offset, self.target);

        zoomed
            || self.pending_theta.abs() > SETTLE_EPS
            || self.pending_phi.abs() > SETTLE_EPS
            || self.pending_pan.length_squared() > SETTLE_EPS * SETTLE_EPS
    }
}
