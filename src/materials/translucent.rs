// Copyright @yucwang 2026

use crate::core::hit::SurfaceSample;
use crate::core::material::{Material, ScatterRecord};
use crate::core::rng::PathRng;
use crate::math::constants::{ Float, Vector3f };
use crate::math::offset::offset_position_along_normal;
use crate::materials::{diffuse_bounce, GRAY_REFLECTANCE};

/// Coin-flip translucency: half the time the path bounces diffusely
/// off the front side, half the time it continues straight through,
/// restarting from the back side of the surface.
pub struct Translucent {
    color: Vector3f,
    diffuse_probability: Float,
}

impl Translucent {
    pub fn new(color: Vector3f, diffuse_probability: Float) -> Self {
        Self { color, diffuse_probability }
    }

    pub fn standard() -> Self {
        Self::new(Vector3f::new(GRAY_REFLECTANCE, GRAY_REFLECTANCE, GRAY_REFLECTANCE), 0.5)
    }
}

impl Material for Translucent {
    fn scatter(&self, sample: &SurfaceSample, rng: &mut PathRng) -> ScatterRecord {
        if rng.next_f32() < self.diffuse_probability {
            let (origin, direction) = diffuse_bounce(sample, rng);
            ScatterRecord::new(self.color, origin, direction)
        } else {
            let origin = offset_position_along_normal(sample.world_position, -sample.world_normal);
            ScatterRecord::new(self.color, origin, sample.incoming)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translucent_branches() {
        let normal = Vector3f::new(0.0, 0.0, 1.0);
        let sample = SurfaceSample::new(
            0,
            Vector3f::new(0.3, 0.3, 0.0),
            Vector3f::new(0.3, 0.3, 0.0),
            normal,
            Vector3f::new(0.0, 0.6, -0.8),
        );

        let material = Translucent::standard();
        let mut saw_pass = false;
        let mut saw_diffuse = false;
        for seed in 0..32 {
            let record = material.scatter(&sample, &mut PathRng::new(seed));
            assert_eq!(record.color, Vector3f::new(0.7, 0.7, 0.7));

            let mut reference = PathRng::new(seed);
            if reference.next_f32() < 0.5 {
                saw_diffuse = true;
                assert!((record.ray_origin - sample.world_position).dot(&normal) > 0.0);
                assert!(record.ray_direction.dot(&normal) > -1e-4);
            } else {
                saw_pass = true;
                // Straight through, restarting behind the surface.
                assert_eq!(record.ray_direction, sample.incoming);
                assert!((record.ray_origin - sample.world_position).dot(&normal) < 0.0);
            }
        }
        assert!(saw_pass && saw_diffuse, "32 seeds should exercise both branches");
    }
}
