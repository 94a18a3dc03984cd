// Copyright @yucwang 2026

use super::constants::{ PI, Float, Vector2f, Vector3f };

/// Mirror reflection of `d` about the unit normal `n`.
pub fn reflect(d: Vector3f, n: Vector3f) -> Vector3f {
    d - 2.0 * d.dot(&n) * n
}

/// Flips `n` so that it opposes `incoming`. After the flip
/// `dot(n, incoming) <= 0` holds.
pub fn face_forward(n: Vector3f, incoming: Vector3f) -> Vector3f {
    if n.dot(&incoming) < 0.0 {
        n
    } else {
        -n
    }
}

/// Cosine-weighted bounce direction about `normal`, by adding a point of
/// the unit sphere to the unit normal. `u.x` drives the azimuth, `u.y`
/// the height; both uniform in [0, 1].
pub fn diffuse_reflection(normal: Vector3f, u: &Vector2f) -> Vector3f {
    let theta: Float = 2. * PI * u.x;
    let z: Float = 2. * u.y - 1.;
    let r: Float = (1. - z * z).sqrt();

    (normal + Vector3f::new(r * theta.cos(), r * theta.sin(), z)).normalize()
}

/* Tests for sampling helpers */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_law() {
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let d = Vector3f::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(d, n);
        let expected = d - 2.0 * d.dot(&n) * n;
        assert_eq!(r, expected);
        assert!((r - Vector3f::new(d.x, -d.y, d.z)).norm() < 1e-6);
        // Angle of incidence equals angle of reflection.
        assert!((d.dot(&n).abs() - r.dot(&n).abs()).abs() < 1e-6);
    }

    #[test]
    fn test_face_forward() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let towards = Vector3f::new(0.0, 0.0, -1.0);
        let away = Vector3f::new(0.0, 0.0, 1.0);

        assert_eq!(face_forward(n, towards), n);
        assert_eq!(face_forward(n, away), -n);
        assert!(face_forward(n, away).dot(&away) <= 0.0);
        // A grazing direction still lands on the non-positive side.
        let grazing = Vector3f::new(1.0, 0.0, 0.0);
        assert!(face_forward(n, grazing).dot(&grazing) <= 0.0);
    }

    #[test]
    fn test_diffuse_reflection_hemisphere() {
        let normal = Vector3f::new(0.0, 0.0, 1.0);
        let mut mean_cos = 0.0;
        let mut count = 0;
        for i in 0..16 {
            for j in 0..16 {
                let u = Vector2f::new((i as Float + 0.5) / 16.0,
                                      (j as Float + 0.5) / 16.0);
                let dir = diffuse_reflection(normal, &u);
                assert!((dir.norm() - 1.0).abs() < 1e-5);
                let cos_theta = dir.dot(&normal);
                assert!(cos_theta > -1e-6);
                mean_cos += cos_theta;
                count += 1;
            }
        }
        // Cosine weighting puts the average cosine at 2/3.
        mean_cos /= count as Float;
        assert!(mean_cos > 0.55 && mean_cos < 0.8, "mean cos {}", mean_cos);
    }

    #[test]
    fn test_diffuse_reflection_tilted_normal() {
        let normal = Vector3f::new(1.0, 1.0, 0.0).normalize();
        for i in 1..8 {
            let u = Vector2f::new(i as Float / 8.0, 0.35);
            let dir = diffuse_reflection(normal, &u);
            assert!((dir.norm() - 1.0).abs() < 1e-5);
            assert!(dir.dot(&normal) > -1e-6);
        }
    }
}
