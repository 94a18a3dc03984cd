// Copyright @yucwang 2026

use crate::math::constants::{ PI, Float, Vector2f };

/// Per-path random stream. One instance belongs to exactly one
/// (pixel, sample batch) pair; parallel paths never share a stream.
///
/// The step is a 32-bit congruential update followed by an
/// xorshift/multiply output permutation, so the stream is a pure
/// function of the seed and replays bit-for-bit.
pub struct PathRng {
    state: u32,
}

impl PathRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(747796405).wrapping_add(1);
        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);
        (word >> 22) ^ word
    }

    /// Uniform draw in [0, 1], both ends included.
    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() as Float) / (u32::MAX as Float)
    }

    /// A pair of standard normal draws via Box-Muller. Consumes exactly
    /// two uniform steps.
    pub fn next_gaussian(&mut self) -> Vector2f {
        let u1 = self.next_f32().max(1e-38);
        let u2 = self.next_f32();
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;

        Vector2f::new(r * theta.cos(), r * theta.sin())
    }
}

/* Tests for PathRng */
