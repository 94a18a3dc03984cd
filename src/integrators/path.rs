// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::core::rng::PathRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{ Vector2f, Vector3f };
use crate::math::ray::Ray3f;

/// Iterative forward path tracer. Each sample jitters the pixel center
/// with a Gaussian, follows the path through up to `max_depth`
/// segments, and returns the sky radiance attenuated by every surface
/// reflectance met on the way. A path that exhausts its segment budget
/// without reaching the sky contributes nothing.
pub struct PathIntegrator {
    max_depth: u32,
    samples_per_pixel: u32,
}

impl PathIntegrator {
    pub fn new(max_depth: u32, samples_per_pixel: u32) -> Self {
        Self { max_depth, samples_per_pixel }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    fn trace_path(&self, scene: &Scene, mut ray: Ray3f, rng: &mut PathRng) -> Vector3f {
        let mut throughput = Vector3f::new(1.0, 1.0, 1.0);

        for _ in 0..self.max_depth {
            match scene.ray_intersection(&ray) {
                Some(hit) => {
                    let sample = scene.surface_sample(&hit, ray.dir());
                    let record = scene.material_for(&hit).scatter(&sample, rng);
                    throughput.component_mul_assign(&record.color);
                    ray = Ray3f::new(record.ray_origin, record.ray_direction, Some(0.0), None);
                }
                None => {
                    return throughput.component_mul(&scene.sky().radiance(&ray.dir()));
                }
            }
        }

        Vector3f::zeros()
    }
}

impl Integrator for PathIntegrator {
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor,
                         pixel: Vector2f, rng: &mut PathRng) -> Vector3f {
        let jitter = 0.375 * rng.next_gaussian();
        let pixel_center = pixel + Vector2f::new(0.5, 0.5) + jitter;
        let ray = sensor.primary_ray(&pixel_center);
        self.trace_path(scene, ray, rng)
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
