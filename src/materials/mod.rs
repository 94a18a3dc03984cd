// Copyright @yucwang 2026

pub mod blend;
pub mod bump;
pub mod cutout;
pub mod debug;
pub mod diffuse;
pub mod mirror;
pub mod translucent;

use crate::core::hit::SurfaceSample;
use crate::core::material::Material;
use crate::core::rng::PathRng;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::offset::offset_position_along_normal;
use crate::math::sampling::diffuse_reflection;
use std::sync::Arc;

/// Uniform reflectance shared by most of the standard materials.
pub const GRAY_REFLECTANCE: Float = 0.7;

// Common diffuse bounce: step off the front side of the surface and
// sample a cosine-weighted direction. Draws exactly two uniforms,
// theta first.
pub(crate) fn diffuse_bounce(sample: &SurfaceSample, rng: &mut PathRng) -> (Vector3f, Vector3f) {
    let origin = offset_position_along_normal(sample.world_position, sample.world_normal);
    let u = Vector2f::new(rng.next_f32(), rng.next_f32());
    let direction = diffuse_reflection(sample.world_normal, &u);
    (origin, direction)
}

/// The standard material table. Indices are stable and referenced by
/// scene descriptions, so entries must not be reordered:
///
///   0 gray diffuse           5 planar grating cutout
///   1 gray mirror            6 bumpy mirror/diffuse
///   2 normal-colored diffuse 7 primitive-id-colored diffuse
///   3 mirror/diffuse blend   8 radial shell cutout
///   4 coin-flip translucent
pub fn standard_set() -> Vec<Arc<dyn Material>> {
    vec![
        Arc::new(diffuse::Diffuse::gray()),
        Arc::new(mirror::Mirror::gray()),
        Arc::new(debug::NormalColor::new()),
        Arc::new(blend::MirrorBlend::standard()),
        Arc::new(translucent::Translucent::standard()),
        Arc::new(cutout::GratingCutout::standard()),
        Arc::new(bump::BumpyMirror::standard()),
        Arc::new(debug::FacetColor::new()),
        Arc::new(cutout::ShellCutout::standard()),
    ]
}
