// Copyright @yucwang 2026

use super::constants::{ Float, Vector3f };

const INT_SCALE: Float = 256.0;
const ORIGIN_THRESHOLD: Float = 1.0 / 32.0;
const FLOAT_SCALE: Float = 1.0 / 65536.0;

/// Nudges a shading position off its surface along `normal` so that a
/// ray restarted there cannot re-hit the surface it just left.
///
/// The step is taken in integer ulps of each coordinate (scaled by the
/// normal), so it stays proportional to the coordinate's floating-point
/// exponent; close to the coordinate origin, where ulps collapse, a
/// plain additive step is used instead. The caller chooses the side by
/// the sign of the normal it passes in.
pub fn offset_position_along_normal(position: Vector3f, normal: Vector3f) -> Vector3f {
    let offset_int = [
        (INT_SCALE * normal[0]) as i32,
        (INT_SCALE * normal[1]) as i32,
        (INT_SCALE * normal[2]) as i32,
    ];

    let mut result = Vector3f::new(0.0, 0.0, 0.0);
    for idx in 0..3 {
        let p: Float = position[idx];
        if p.abs() < ORIGIN_THRESHOLD {
            result[idx] = p + FLOAT_SCALE * normal[idx];
        } else {
            let shifted = if p < 0.0 {
                (p.to_bits() as i32).wrapping_sub(offset_int[idx])
            } else {
                (p.to_bits() as i32).wrapping_add(offset_int[idx])
            };
            result[idx] = Float::from_bits(shifted as u32);
        }
    }

    result
}

/* Tests for the self-intersection offset */

#[cfg(test)]
mod tests {
    use super::*;

    fn check_both_sides(p: Vector3f, n: Vector3f) {
        let front = offset_position_along_normal(p, n);
        let back = offset_position_along_normal(p, -n);

        let d_front = (front - p).dot(&n);
        let d_back = (back - p).dot(&n);

        // Opposite sides of the surface, each a real distance away.
        assert!(d_front > 0.0, "front offset did not move off {:?}", p);
        assert!(d_back < 0.0, "back offset did not move off {:?}", p);
        assert!((front - p).norm() > 0.0);
        assert!((back - p).norm() > 0.0);
    }

    #[test]
    fn test_offset_near_origin() {
        check_both_sides(Vector3f::new(0.0, 0.0, 0.0),
                         Vector3f::new(0.0, 1.0, 0.0));
        check_both_sides(Vector3f::new(0.001, -0.002, 0.0005),
                         Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_offset_far_from_origin() {
        let n = Vector3f::new(0.0, 1.0, 0.0).normalize();
        check_both_sides(Vector3f::new(950.0, -830.0, 1200.0), n);
        check_both_sides(Vector3f::new(-4.25, 7.5, -9.125), n);
    }

    #[test]
    fn test_offset_oblique_normal() {
        let n = Vector3f::new(1.0, 1.0, 1.0).normalize();
        check_both_sides(Vector3f::new(2.0, -3.0, 5.0), n);
        check_both_sides(Vector3f::new(-0.004, 100.0, 0.02), n);
    }

    #[test]
    fn test_offset_scales_with_magnitude() {
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let near = offset_position_along_normal(Vector3f::new(0.5, 0.5, 0.5), n);
        let far = offset_position_along_normal(Vector3f::new(0.5, 4096.0, 0.5), n);

        let step_near = near[1] - 0.5;
        let step_far = far[1] - 4096.0;
        assert!(step_near > 0.0);
        // The ulp-based step grows with the exponent of the coordinate.
        assert!(step_far > step_near);
    }
}
