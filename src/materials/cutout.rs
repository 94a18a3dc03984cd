// Copyright @yucwang 2026

use crate::core::hit::SurfaceSample;
use crate::core::material::{Material, ScatterRecord};
use crate::core::rng::PathRng;
use crate::math::constants::{ Float, Vector3f };
use crate::math::offset::offset_position_along_normal;
use crate::materials::{diffuse_bounce, GRAY_REFLECTANCE};

fn pass_through(sample: &SurfaceSample) -> ScatterRecord {
    let origin = offset_position_along_normal(sample.world_position, -sample.world_normal);
    ScatterRecord::new(Vector3f::new(1.0, 1.0, 1.0), origin, sample.incoming)
}

fn gray_diffuse(sample: &SurfaceSample, rng: &mut PathRng) -> ScatterRecord {
    let (origin, direction) = diffuse_bounce(sample, rng);
    let gray = Vector3f::new(GRAY_REFLECTANCE, GRAY_REFLECTANCE, GRAY_REFLECTANCE);
    ScatterRecord::new(gray, origin, direction)
}

/// Periodic planar cutout: object-space coordinate planes carve the
/// surface into diffuse stripes and fully transparent gaps. The pattern
/// follows the object, so every instance of a mesh is cut identically.
pub struct GratingCutout {
    period: Float,
    solid_threshold: Float,
}

impl GratingCutout {
    pub fn new(period: Float, solid_threshold: Float) -> Self {
        Self { period, solid_threshold }
    }

    pub fn standard() -> Self {
        Self::new(0.5, 0.25)
    }
}

impl Material for GratingCutout {
    fn scatter(&self, sample: &SurfaceSample, rng: &mut PathRng) -> ScatterRecord {
        let p = sample.object_position;
        if (p.x + p.y + p.z).rem_euclid(self.period) >= self.solid_threshold {
            gray_diffuse(sample, rng)
        } else {
            pass_through(sample)
        }
    }
}

/// Concentric-shell cutout: the distance from the object origin is
/// folded by a period, leaving thin transparent shells between diffuse
/// ones.
pub struct ShellCutout {
    period: Float,
    hollow_threshold: Float,
}

impl ShellCutout {
    pub fn new(period: Float, hollow_threshold: Float) -> Self {
        Self { period, hollow_threshold }
    }

    pub fn standard() -> Self {
        Self::new(0.2, 0.05)
    }
}

impl Material for ShellCutout {
    fn scatter(&self, sample: &SurfaceSample, rng: &mut PathRng) -> ScatterRecord {
        if sample.object_position.norm().rem_euclid(self.period) >= self.hollow_threshold {
            gray_diffuse(sample, rng)
        } else {
            pass_through(sample)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_at(object_position: Vector3f) -> SurfaceSample {
        SurfaceSample::new(
            0,
            object_position,
            object_position + Vector3f::new(5.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, -1.0),
        )
    }

    fn assert_transparent(record: &ScatterRecord, sample: &SurfaceSample) {
        assert_eq!(record.color, Vector3f::new(1.0, 1.0, 1.0));
        assert_eq!(record.ray_direction, sample.incoming);
        assert!((record.ray_origin - sample.world_position).dot(&sample.world_normal) < 0.0);
    }

    fn assert_solid(record: &ScatterRecord, sample: &SurfaceSample) {
        assert_eq!(record.color, Vector3f::new(0.7, 0.7, 0.7));
        assert!((record.ray_origin - sample.world_position).dot(&sample.world_normal) > 0.0);
    }

    #[test]
    fn test_grating_pattern_points() {
        let material = GratingCutout::standard();

        // Sum 0.0 folds to 0.0, inside the transparent band.
        let sample = sample_at(Vector3f::new(0.0, 0.0, 0.0));
        let record = material.scatter(&sample, &mut PathRng::new(1));
        assert_transparent(&record, &sample);

        // Sum 0.3 is past the 0.25 threshold.
        let sample = sample_at(Vector3f::new(0.3, 0.0, 0.0));
        let record = material.scatter(&sample, &mut PathRng::new(1));
        assert_solid(&record, &sample);

        // Negative sums fold into [0, 0.5), not toward zero:
        // -0.1 folds to 0.4.
        let sample = sample_at(Vector3f::new(-0.1, 0.0, 0.0));
        let record = material.scatter(&sample, &mut PathRng::new(1));
        assert_solid(&record, &sample);

        // The pattern keys off object space even when world space
        // differs (the world position above is shifted by 5).
        let sample = sample_at(Vector3f::new(0.1, 0.0, 0.0));
        let record = material.scatter(&sample, &mut PathRng::new(1));
        assert_transparent(&record, &sample);
    }

    #[test]
    fn test_shell_pattern_points() {
        let material = ShellCutout::standard();

        let sample = sample_at(Vector3f::new(0.0, 0.0, 0.0));
        let record = material.scatter(&sample, &mut PathRng::new(1));
        assert_transparent(&record, &sample);

        let sample = sample_at(Vector3f::new(0.1, 0.0, 0.0));
        let record = material.scatter(&sample, &mut PathRng::new(1));
        assert_solid(&record, &sample);

        // Radius 0.21 folds to 0.01, back inside a hollow shell.
        let sample = sample_at(Vector3f::new(0.21, 0.0, 0.0));
        let record = material.scatter(&sample, &mut PathRng::new(1));
        assert_transparent(&record, &sample);
    }
}
