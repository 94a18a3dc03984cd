// Copyright @yucwang 2026

use crate::core::hit::SurfaceSample;
use crate::core::material::{Material, ScatterRecord};
use crate::core::rng::PathRng;
use crate::math::constants::Vector3f;
use crate::math::offset::offset_position_along_normal;
use crate::math::sampling::reflect;
use crate::materials::GRAY_REFLECTANCE;

/// Perfect specular reflector.
pub struct Mirror {
    color: Vector3f,
}

impl Mirror {
    pub fn new(color: Vector3f) -> Self {
        Self { color }
    }

    pub fn gray() -> Self {
        Self::new(Vector3f::new(GRAY_REFLECTANCE, GRAY_REFLECTANCE, GRAY_REFLECTANCE))
    }
}

impl Material for Mirror {
    fn scatter(&self, sample: &SurfaceSample, _rng: &mut PathRng) -> ScatterRecord {
        let origin = offset_position_along_normal(sample.world_position, sample.world_normal);
        let direction = reflect(sample.incoming, sample.world_normal);
        ScatterRecord::new(self.color, origin, direction)
    }
}
