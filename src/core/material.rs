// Copyright @yucwang 2026

use crate::core::hit::SurfaceSample;
use crate::core::rng::PathRng;
use crate::math::constants::Vector3f;

// Definitions of types used in material scattering
#[derive(Debug, PartialEq)]
pub struct ScatterRecord {
    pub color: Vector3f,
    pub ray_origin: Vector3f,
    pub ray_direction: Vector3f,
}

impl ScatterRecord {
    pub fn new(color: Vector3f, ray_origin: Vector3f, ray_direction: Vector3f) -> Self {
        Self { color, ray_origin, ray_direction }
    }
}

/// One entry of the material table. Given a resolved surface point and
/// the path's random stream, a material decides the reflectance tint
/// and the continuation ray of the path. Variants draw from the stream
/// in a fixed documented order so a scatter replays exactly for a
/// replayed stream.
pub trait Material: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn scatter(&self, sample: &SurfaceSample, rng: &mut PathRng) -> ScatterRecord;
}
