use canele::core::integrator::Integrator;
use canele::core::rng::PathRng;
use canele::core::scene_loader::load_scene_with_settings;
use canele::integrators::path::PathIntegrator;
use canele::math::constants::{Float, Vector2f, Vector3f};
use std::env;

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <scene.xml> <x> <y> [--spp N] [--batches N] [--max-depth N] [--seed N]", args[0]);
        std::process::exit(1);
    }

    let scene_path = &args[1];
    let x: usize = args[2].parse().unwrap_or(0);
    let y: usize = args[3].parse().unwrap_or(0);

    let mut spp_override: Option<u32> = None;
    let mut batches_override: Option<u32> = None;
    let mut max_depth_override: Option<u32> = None;
    let mut seed: u32 = 0;

    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "--spp" => {
                i += 1;
                spp_override = args.get(i).and_then(|v| v.parse::<u32>().ok());
            }
            "--batches" => {
                i += 1;
                batches_override = args.get(i).and_then(|v| v.parse::<u32>().ok());
            }
            "--max-depth" => {
                i += 1;
                max_depth_override = args.get(i).and_then(|v| v.parse::<u32>().ok());
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(seed);
            }
            _ => {}
        }
        i += 1;
    }

    let load_result = load_scene_with_settings(scene_path)
        .unwrap_or_else(|e| panic!("failed to load scene: {}", e));
    let scene = load_result.scene;
    let sensor = load_result.sensor.expect("scene file defines no sensor");
    let (width, height) = (sensor.width(), sensor.height());
    if x >= width || y >= height {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}", x, y, width, height);
        std::process::exit(2);
    }

    let spp = spp_override.or(load_result.samples_per_pixel).unwrap_or(64).max(1);
    let batches = batches_override.or(load_result.sample_batches).unwrap_or(32).max(1);
    let max_depth = max_depth_override.or(load_result.max_depth).unwrap_or(32);
    let integrator = PathIntegrator::new(max_depth, spp);

    let pixel = Vector2f::new(x as Float, y as Float);
    let mut accum = Vector3f::zeros();
    for batch in 0..batches {
        // Same per-pixel stream the full renderer uses for this batch.
        let pixel_seed = batch
            .wrapping_mul(height as u32)
            .wrapping_add(y as u32)
            .wrapping_mul(width as u32)
            .wrapping_add(x as u32)
            .wrapping_add(seed);
        let mut rng = PathRng::new(pixel_seed);
        for _ in 0..spp {
            accum += integrator.trace_ray_forward(&scene, sensor.as_ref(), pixel, &mut rng);
        }
    }

    let inv_count = 1.0 / ((batches * spp) as Float);
    let avg = accum * inv_count;
    println!(
        "pixel ({}, {}) spp={}x{} depth={} -> R {:.6}, G {:.6}, B {:.6}",
        x, y, batches, spp, max_depth, avg.x, avg.y, avg.z
    );
}
