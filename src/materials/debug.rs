// Copyright @yucwang 2026

use crate::core::hit::SurfaceSample;
use crate::core::material::{Material, ScatterRecord};
use crate::core::rng::PathRng;
use crate::math::constants::{ Float, Vector3f };
use crate::materials::diffuse_bounce;

/// Visualization material: tints by the oriented shading normal,
/// remapped from [-1,1] to [0,1], then bounces diffusely.
pub struct NormalColor;

impl NormalColor {
    pub fn new() -> Self {
        Self
    }
}

impl Material for NormalColor {
    fn scatter(&self, sample: &SurfaceSample, rng: &mut PathRng) -> ScatterRecord {
        let n = sample.world_normal;
        let color = Vector3f::new(0.5 + 0.5 * n.x, 0.5 + 0.5 * n.y, 0.5 + 0.5 * n.z);
        let (origin, direction) = diffuse_bounce(sample, rng);
        ScatterRecord::new(color, origin, direction)
    }
}

/// Visualization material: tints by the triangle index so each facet of
/// a mesh gets a distinct color, then bounces diffusely.
pub struct FacetColor;

impl FacetColor {
    pub fn new() -> Self {
        Self
    }
}

impl Material for FacetColor {
    fn scatter(&self, sample: &SurfaceSample, rng: &mut PathRng) -> ScatterRecord {
        let id = sample.primitive_index as Float;
        let color = Vector3f::new(
            (id / 36.0).clamp(0.0, 1.0),
            (id / 9.0).clamp(0.0, 1.0),
            (id / 18.0).clamp(0.0, 1.0),
        );
        let (origin, direction) = diffuse_bounce(sample, rng);
        ScatterRecord::new(color, origin, direction)
    }
}
