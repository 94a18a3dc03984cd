// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::core::rng::PathRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::{AccumulationBuffer, Bitmap};
use crate::math::constants::{ Float, Vector2f, Vector3f };
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

pub use super::renderer::Renderer;

/// Renders the image as a sequence of sample batches, accumulating raw
/// radiance sums and averaging once at the end. Within a batch, image
/// blocks are handed out to a pool of worker threads; across batches
/// every pixel reseeds its own random stream from the batch index, so
/// the output is identical no matter how many threads run or how the
/// blocks are scheduled.
pub struct BatchRenderer {
    integrator: Box<dyn Integrator>,
    batches: u32,
    seed: u32,
}

impl BatchRenderer {
    pub fn new(integrator: Box<dyn Integrator>, batches: u32, seed: u32) -> Self {
        Self { integrator, batches, seed }
    }

    fn pixel_seed(&self, batch: u32, x: usize, y: usize, width: usize, height: usize) -> u32 {
        batch
            .wrapping_mul(height as u32)
            .wrapping_add(y as u32)
            .wrapping_mul(width as u32)
            .wrapping_add(x as u32)
            .wrapping_add(self.seed)
    }
}

impl Renderer for BatchRenderer {
    fn render(&self, scene: &Scene, sensor: &dyn Sensor) -> Bitmap {
        let width = sensor.width();
        let height = sensor.height();
        if width == 0 || height == 0 {
            return Bitmap::new(0, 0);
        }

        let spp = match self.integrator.samples_per_pixel() {
            0 => 1,
            v => v,
        };
        let batches = self.batches.max(1);

        let block_size = 128usize;
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;
        let integrator_ref: &dyn Integrator = self.integrator.as_ref();

        let progress = ProgressBar::new(total_blocks as u64 * batches as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let mut accumulation = AccumulationBuffer::new(width, height);

        for batch in 0..batches {
            let next_block = Arc::new(AtomicUsize::new(0));
            let (tx, rx) = mpsc::channel::<(usize, usize, usize, usize, Vec<Vector3f>)>();

            thread::scope(|scope| {
                for _ in 0..thread_count {
                    let next_block = Arc::clone(&next_block);
                    let tx = tx.clone();
                    scope.spawn(move || {
                        loop {
                            let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                            if block_index >= total_blocks {
                                break;
                            }

                            let bx = block_index % blocks_x;
                            let by = block_index / blocks_x;
                            let x0 = bx * block_size;
                            let y0 = by * block_size;
                            let x1 = (x0 + block_size).min(width);
                            let y1 = (y0 + block_size).min(height);

                            let mut block = vec![Vector3f::zeros(); (x1 - x0) * (y1 - y0)];
                            for y in y0..y1 {
                                for x in x0..x1 {
                                    let pixel = Vector2f::new(x as Float, y as Float);
                                    let mut rng = PathRng::new(
                                        self.pixel_seed(batch, x, y, width, height));
                                    let mut color = Vector3f::zeros();
                                    for _sample in 0..spp {
                                        color += integrator_ref.trace_ray_forward(
                                            scene, sensor, pixel, &mut rng);
                                    }
                                    let local_x = x - x0;
                                    let local_y = y - y0;
                                    block[local_x + (x1 - x0) * local_y] = color;
                                }
                            }
                            if tx.send((x0, y0, x1, y1, block)).is_err() {
                                break;
                            }
                        }
                    });
                }

                drop(tx);
                for _ in 0..total_blocks {
                    if let Ok((x0, y0, x1, y1, block)) = rx.recv() {
                        for y in y0..y1 {
                            for x in x0..x1 {
                                let local_x = x - x0;
                                let local_y = y - y0;
                                accumulation.accumulate(
                                    x, y, block[local_x + (x1 - x0) * local_y]);
                            }
                        }
                        progress.inc(1);
                    }
                }
            });

            accumulation.finish_batch(spp);
        }

        progress.finish_and_clear();
        accumulation.resolve()
    }
}
