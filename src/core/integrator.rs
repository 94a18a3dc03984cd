// Copyright @yucwang 2026

use crate::core::rng::PathRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{ Vector2f, Vector3f };

/// Radiance estimators. One call produces one sample's worth of
/// radiance for a pixel, drawing the subpixel jitter and every path
/// decision from the caller's random stream.
pub trait Integrator: Sync {
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor,
                         pixel: Vector2f, rng: &mut PathRng) -> Vector3f;
    fn samples_per_pixel(&self) -> u32;
}
