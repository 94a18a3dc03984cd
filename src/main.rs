// Copyright 2020 TwoCookingMice

use canele::core::scene_loader::load_scene_with_settings;
use canele::integrators::path::PathIntegrator;
use canele::io::exr_utils;
use canele::io::hdr_utils;
use canele::renderers::batch::BatchRenderer;
use canele::renderers::renderer::Renderer;

use std::env;

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <scene.xml> <output.(exr|hdr)> [--spp N] [--batches N] [--max-depth N] [--seed N]", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let mut spp_override: Option<u32> = None;
    let mut batches_override: Option<u32> = None;
    let mut max_depth_override: Option<u32> = None;
    let mut seed: u32 = 0;

    let mut i = 3;
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
                seed = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(0);
            }
            _ => {}
        }
        i += 1;
    }

    let load_result = load_scene_with_settings(input_path)
        .expect("failed to load scene");

    let scene = load_result.scene;
    let sensor = load_result.sensor.expect("scene file defines no sensor");
    let spp = spp_override.or(load_result.samples_per_pixel).unwrap_or(64);
    let batches = batches_override.or(load_result.sample_batches).unwrap_or(32);
    let max_depth = max_depth_override.or(load_result.max_depth).unwrap_or(32);

    log::info!("Rendering {}x{} at {} spp x {} batches, max depth {}.",
               sensor.width(), sensor.height(), spp, batches, max_depth);

    let integrator = Box::new(PathIntegrator::new(max_depth, spp));
    let renderer = BatchRenderer::new(integrator, batches, seed);
    let image = renderer.render(&scene, sensor.as_ref());

    if output_path.ends_with(".hdr") {
        hdr_utils::write_hdr_to_file(&image.raw_copy(), image.width(), image.height(), output_path)
            .expect("failed to write hdr");
    } else {
        exr_utils::write_exr_to_file(&image.raw_copy(), image.width(), image.height(), output_path);
    }
}
