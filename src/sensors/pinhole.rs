// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Look-at pinhole camera. Screen coordinates are normalized by the
/// image height on both axes, so the horizontal field of view follows
/// the aspect ratio and `fov_slope` is the tangent of half the vertical
/// field of view.
pub struct PinholeCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    fov_slope: Float,
    width: usize,
    height: usize,
}

impl PinholeCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               width: usize,
               height: usize) -> Self {
        Self::with_fov_slope(origin, target, up,
                             (0.5 * fov_y_radians).tan(), width, height)
    }

    pub fn with_fov_slope(origin: Vector3f,
                          target: Vector3f,
                          up: Vector3f,
                          fov_slope: Float,
                          width: usize,
                          height: usize) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();

        Self { origin, forward, right, up, fov_slope, width, height }
    }

    pub fn fov_slope(&self) -> Float {
        self.fov_slope
    }
}

impl Sensor for PinholeCamera {
    fn primary_ray(&self, pixel_center: &Vector2f) -> Ray3f {
        let u = (2.0 * pixel_center.x - self.width as Float) / (self.height as Float);
        let v = -(2.0 * pixel_center.y - self.height as Float) / (self.height as Float);

        let dir = self.right * (self.fov_slope * u)
            + self.up * (self.fov_slope * v)
            + self.forward;
        Ray3f::new(self.origin, dir, Some(0.0), None)
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn describe(&self) -> String {
        format!("PinholeCamera {}x{}\n  origin: {:?}\n  forward: {:?}\n  fov_slope: {}",
                self.width, self.height, self.origin, self.forward, self.fov_slope)
    }
}
