// Copyright @yucwang 2026

use super::constants::{ Float, Vector3f };

use std::ops;
use std::vec::Vec;

#[derive(Debug, Clone)]
pub struct Bitmap {
    data: Vec<Vector3f>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Vector3f;

    fn index(&self, index: (usize, usize)) -> &Vector3f {
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Vector3f {
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec!(Vector3f::new(0.0, 0.0, 0.0);
                          pixel_number),
               width,
               height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn raw_copy(&self) -> Vec<(Float, Float, Float)> {
        self.data.iter().map(|p| (p[0], p[1], p[2])).collect()
    }
}

/// Per-pixel radiance sums, shared across sample batches. Every batch
/// adds raw per-sample sums; `resolve` divides once by the total sample
/// count at the very end, so the estimate does not depend on how the
/// samples were split into batches.
#[derive(Debug)]
pub struct AccumulationBuffer {
    sums: Vec<Vector3f>,
    height: usize,
    width: usize,
    samples_per_pixel: u32,
}

impl AccumulationBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { sums: vec!(Vector3f::new(0.0, 0.0, 0.0); width * height),
               width,
               height,
               samples_per_pixel: 0 }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn accumulate(&mut self, x: usize, y: usize, radiance_sum: Vector3f) {
        self.sums[x + self.width * y] += radiance_sum;
    }

    // Records that every pixel just received another `samples` samples.
    pub fn finish_batch(&mut self, samples: u32) {
        self.samples_per_pixel += samples;
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn resolve(&self) -> Bitmap {
        let mut bitmap = Bitmap::new(self.width, self.height);
        if self.samples_per_pixel == 0 {
            return bitmap;
        }

        let inv_count = 1.0 / (self.samples_per_pixel as Float);
        for y in 0..self.height {
            for x in 0..self.width {
                bitmap[(x, y)] = self.sums[x + self.width * y] * inv_count;
            }
        }

        bitmap
    }
}

/* Tests for Bitmap */
