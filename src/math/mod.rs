// Copyright @yucwang 2026

pub mod aabb;
pub mod bitmap;
pub mod constants;
pub mod offset;
pub mod ray;
pub mod sampling;
pub mod transform;
