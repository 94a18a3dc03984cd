// Copyright @yucwang 2021

pub mod bvh;
pub mod hit;
pub mod integrator;
pub mod material;
pub mod rng;
pub mod scene;
pub mod scene_loader;
pub mod sensor;
