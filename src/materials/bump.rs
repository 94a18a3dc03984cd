// Copyright @yucwang 2026

use crate::core::hit::SurfaceSample;
use crate::core::material::{Material, ScatterRecord};
use crate::core::rng::PathRng;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::offset::offset_position_along_normal;
use crate::math::sampling::{diffuse_reflection, reflect};
use crate::materials::GRAY_REFLECTANCE;

/// Mirror/diffuse blend shaded around a procedurally bumped normal.
/// A per-axis sine of the world position perturbs the geometric normal
/// into a shading normal; the lobe draw and the bounce both use the
/// shading normal. The continuation origin is offset along the
/// geometric normal before any perturbation, and a direction that ends
/// up pointing into the surface is reflected back across the geometric
/// normal rather than discarded.
pub struct BumpyMirror {
    color: Vector3f,
    amplitude: Float,
    frequency: Float,
    mirror_probability: Float,
}

impl BumpyMirror {
    pub fn new(color: Vector3f, amplitude: Float, frequency: Float,
               mirror_probability: Float) -> Self {
        Self { color, amplitude, frequency, mirror_probability }
    }

    pub fn standard() -> Self {
        Self::new(Vector3f::new(GRAY_REFLECTANCE, GRAY_REFLECTANCE, GRAY_REFLECTANCE),
                  0.03, 80.0, 0.4)
    }

    fn shading_normal(&self, sample: &SurfaceSample) -> Vector3f {
        let p = sample.world_position * self.frequency;
        let perturbation = self.amplitude * Vector3f::new(p.x.sin(), p.y.sin(), p.z.sin());
        (sample.world_normal + perturbation).normalize()
    }
}

impl Material for BumpyMirror {
    fn scatter(&self, sample: &SurfaceSample, rng: &mut PathRng) -> ScatterRecord {
        let origin = offset_position_along_normal(sample.world_position, sample.world_normal);
        let shading_normal = self.shading_normal(sample);

        let mut direction = if rng.next_f32() < self.mirror_probability {
            reflect(sample.incoming, shading_normal)
        } else {
            let u = Vector2f::new(rng.next_f32(), rng.next_f32());
            diffuse_reflection(shading_normal, &u)
        };

        if direction.dot(&sample.world_normal) <= 0.0 {
            direction = reflect(direction, sample.world_normal);
        }

        ScatterRecord::new(self.color, origin, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bumpy_sample() -> SurfaceSample {
        // sin(80 * 0.1) and sin(80 * 0.2) are both nonzero, so the
        // shading normal tilts away from the geometric one here.
        SurfaceSample::new(
            0,
            Vector3f::new(0.1, 0.2, 0.0),
            Vector3f::new(0.1, 0.2, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.6, 0.0, -0.8),
        )
    }

    #[test]
    fn test_bumpy_mirror_branches_replay() {
        let sample = bumpy_sample();
        let material = BumpyMirror::standard();
        let shading_normal = material.shading_normal(&sample);
        assert!((shading_normal - sample.world_normal).norm() > 1e-3);

        let mut saw_mirror = false;
        let mut saw_diffuse = false;
        for seed in 0..32 {
            let record = material.scatter(&sample, &mut PathRng::new(seed));

            let mut reference = PathRng::new(seed);
            let mut expected = if reference.next_f32() < 0.4 {
                saw_mirror = true;
                reflect(sample.incoming, shading_normal)
            } else {
                saw_diffuse = true;
                let u = Vector2f::new(reference.next_f32(), reference.next_f32());
                diffuse_reflection(shading_normal, &u)
            };
            if expected.dot(&sample.world_normal) <= 0.0 {
                expected = reflect(expected, sample.world_normal);
            }
            assert_eq!(record.ray_direction, expected);
        }
        assert!(saw_mirror && saw_diffuse, "32 seeds should exercise both lobes");
    }

    #[test]
    fn test_bumpy_mirror_never_points_into_surface() {
        let sample = bumpy_sample();
        let material = BumpyMirror::standard();
        for seed in 0..128 {
            let record = material.scatter(&sample, &mut PathRng::new(seed));
            assert!(record.ray_direction.dot(&sample.world_normal) >= -1e-6);
        }
    }

    #[test]
    fn test_bumpy_mirror_origin_uses_geometric_normal() {
        let sample = bumpy_sample();
        let record = BumpyMirror::standard().scatter(&sample, &mut PathRng::new(2));
        let expected = offset_position_along_normal(sample.world_position, sample.world_normal);
        assert_eq!(record.ray_origin, expected);
    }
}
