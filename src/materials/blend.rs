// Copyright @yucwang 2026

use crate::core::hit::SurfaceSample;
use crate::core::material::{Material, ScatterRecord};
use crate::core::rng::PathRng;
use crate::math::constants::{ Float, Vector3f };
use crate::math::offset::offset_position_along_normal;
use crate::math::sampling::reflect;
use crate::materials::{diffuse_bounce, GRAY_REFLECTANCE};

/// Probabilistic blend of a mirror and a diffuse lobe. One uniform is
/// drawn first to pick the lobe; the diffuse branch then draws its own
/// two uniforms.
pub struct MirrorBlend {
    color: Vector3f,
    mirror_probability: Float,
}

impl MirrorBlend {
    pub fn new(color: Vector3f, mirror_probability: Float) -> Self {
        Self { color, mirror_probability }
    }

    pub fn standard() -> Self {
        Self::new(Vector3f::new(GRAY_REFLECTANCE, GRAY_REFLECTANCE, GRAY_REFLECTANCE), 0.2)
    }
}

impl Material for MirrorBlend {
    fn scatter(&self, sample: &SurfaceSample, rng: &mut PathRng) -> ScatterRecord {
        if rng.next_f32() < self.mirror_probability {
            let origin = offset_position_along_normal(sample.world_position, sample.world_normal);
            let direction = reflect(sample.incoming, sample.world_normal);
            ScatterRecord::new(self.color, origin, direction)
        } else {
            let (origin, direction) = diffuse_bounce(sample, rng);
            ScatterRecord::new(self.color, origin, direction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector2f;
    use crate::math::sampling::diffuse_reflection;

    fn tilted_sample() -> SurfaceSample {
        SurfaceSample::new(
            0,
            Vector3f::new(0.2, 0.1, 0.4),
            Vector3f::new(0.2, 0.1, 0.4),
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.6, -0.8, 0.0),
        )
    }

    #[test]
    fn test_blend_follows_lobe_draw() {
        let sample = tilted_sample();
        let material = MirrorBlend::standard();

        // For each seed, replay the stream by hand and check the
        // branch the first draw selects was actually taken.
        let mut saw_mirror = false;
        let mut saw_diffuse = false;
        for seed in 0..32 {
            let record = material.scatter(&sample, &mut PathRng::new(seed));

            let mut reference = PathRng::new(seed);
            if reference.next_f32() < 0.2 {
                saw_mirror = true;
                let expected = reflect(sample.incoming, sample.world_normal);
                assert_eq!(record.ray_direction, expected);
            } else {
                saw_diffuse = true;
                let u = Vector2f::new(reference.next_f32(), reference.next_f32());
                let expected = diffuse_reflection(sample.world_normal, &u);
                assert_eq!(record.ray_direction, expected);
            }
        }
        assert!(saw_mirror && saw_diffuse, "32 seeds should exercise both lobes");
    }

    #[test]
    fn test_blend_extreme_probabilities() {
        let sample = tilted_sample();
        let always_mirror = MirrorBlend::new(Vector3f::new(0.7, 0.7, 0.7), 1.1);
        let never_mirror = MirrorBlend::new(Vector3f::new(0.7, 0.7, 0.7), -0.1);
        let expected = reflect(sample.incoming, sample.world_normal);

        for seed in 0..8 {
            let record = always_mirror.scatter(&sample, &mut PathRng::new(seed));
            assert_eq!(record.ray_direction, expected);

            let record = never_mirror.scatter(&sample, &mut PathRng::new(seed));
            assert!(record.ray_direction.dot(&sample.world_normal) > -1e-4);
        }
    }
}
