// Copyright @yucwang 2026

use super::constants::{Float, Vector3f, RAY_T_MAX};

pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
    pub min_t: Float,
    pub max_t: Float
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f,
               min_t: Option<Float>, max_t: Option<Float>) -> Self {
        Self { origin: o, dir: d.normalize(),
               min_t: min_t.unwrap_or(0.0),
               max_t: max_t.unwrap_or(RAY_T_MAX)}
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    // Shrinks the reach of the ray to a confirmed hit distance.
    pub fn update(&mut self, t: Float) -> bool {
        if t < self.min_t || t > self.max_t {
            false
        } else {
            self.max_t = t;
            true
        }
    }

    pub fn test_segment(&self, t: Float) -> bool {
        t >= self.min_t && t <= self.max_t
    }
}

/* Tests for Ray */

#[cfg(test)]
mod tests {
    use super::{Ray3f, Vector3f, RAY_T_MAX};

    #[test]
    fn test_ray3f_basic() {
        let o = Vector3f::new(1.0, 2.0, 3.0);
        let d = Vector3f::new(0.0, 0.0, -2.0);
        let ray = Ray3f::new(o, d, None, None);

        assert_eq!(ray.origin(), o);
        assert_eq!(ray.dir(), Vector3f::new(0.0, 0.0, -1.0));
        assert_eq!(ray.min_t, 0.0);
        assert_eq!(ray.max_t, RAY_T_MAX);

        let p = ray.at(3.0);
        assert_eq!(p, Vector3f::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_ray3f_update_shrinks_reach() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        let d = Vector3f::new(1.0, 0.0, 0.0);
        let mut ray = Ray3f::new(o, d, None, None);

        assert!(ray.update(100.0));
        assert_eq!(ray.max_t, 100.0);
        assert!(!ray.update(105.0));
        assert_eq!(ray.max_t, 100.0);
        assert!(ray.test_segment(99.0));
        assert!(!ray.test_segment(101.0));
    }
}
