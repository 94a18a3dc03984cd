// Copyright @yucwang 2026

use crate::math::constants::{ Float, Vector2f, Vector3f };

/// Raw intersection report: which instance and triangle were hit, where
/// along the ray, and the two free barycentric coordinates. Produced by
/// scene traversal, consumed immediately by the surface resolver.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HitRecord {
    pub instance_index: usize,
    pub primitive_index: usize,
    pub barycentrics: Vector2f,
    pub t: Float,
}

impl HitRecord {
    pub fn new(instance_index: usize, primitive_index: usize,
               barycentrics: Vector2f, t: Float) -> Self {
        Self { instance_index, primitive_index, barycentrics, t }
    }
}

/// Shading-ready surface point derived from a `HitRecord`: positions in
/// object and world space, a unit world normal already flipped against
/// the incoming direction, and the direction itself.
#[derive(Debug, Copy, Clone)]
pub struct SurfaceSample {
    pub primitive_index: usize,
    pub object_position: Vector3f,
    pub world_position: Vector3f,
    pub world_normal: Vector3f,
    pub incoming: Vector3f,
}

impl SurfaceSample {
    pub fn new(primitive_index: usize,
               object_position: Vector3f,
               world_position: Vector3f,
               world_normal: Vector3f,
               incoming: Vector3f) -> Self {
        Self { primitive_index, object_position, world_position,
               world_normal, incoming }
    }
}
