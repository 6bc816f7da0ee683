//! Lumen Math - double-precision primitives shared by every Lumen crate.
//!
//! Positions, directions and colors are all `glam::DVec3`. Keeping one
//! precision across the core avoids the drift seen when intervals and
//! angles are computed in `f32` while geometry is `f64`.

pub use glam;
pub use glam::DVec3 as Vec3;

mod aabb;
mod interval;
mod ray;

pub use aabb::{Aabb, Axis};
pub use interval::Interval;
pub use ray::Ray;

/// A position in world or object space.
pub type Point3 = Vec3;

/// Linear RGB radiance or reflectance. Components may exceed 1.0.
pub type Color = Vec3;

/// Threshold below which a vector is treated as zero length.
pub const NEAR_ZERO: f64 = 1e-8;

/// Returns true if every component of `v` is within [`NEAR_ZERO`] of zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.x.abs() < NEAR_ZERO && v.y.abs() < NEAR_ZERO && v.z.abs() < NEAR_ZERO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(a.cross(b), Vec3::new(-3.0, 6.0, -3.0));
    }

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::splat(1e-9)));
        assert!(!near_zero(Vec3::new(0.0, 1e-3, 0.0)));
    }
}
