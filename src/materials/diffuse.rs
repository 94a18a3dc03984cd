// Copyright @yucwang 2026

use crate::core::hit::SurfaceSample;
use crate::core::material::{Material, ScatterRecord};
use crate::core::rng::PathRng;
use crate::math::constants::Vector3f;
use crate::materials::{diffuse_bounce, GRAY_REFLECTANCE};

/// Cosine-weighted diffuse reflector with a constant reflectance.
pub struct Diffuse {
    color: Vector3f,
}

impl Diffuse {
    pub fn new(color: Vector3f) -> Self {
        Self { color }
    }

    pub fn gray() -> Self {
        Self::new(Vector3f::new(GRAY_REFLECTANCE, GRAY_REFLECTANCE, GRAY_REFLECTANCE))
    }
}

impl Material for Diffuse {
    fn scatter(&self, sample: &SurfaceSample, rng: &mut PathRng) -> ScatterRecord {
        let (origin, direction) = diffuse_bounce(sample, rng);
        ScatterRecord::new(self.color, origin, direction)
    }
}
