//! Volume Containment
//!
//! Pure containment tests for capture zones and team bases.

use serde::{Serialize, Deserialize};

use super::vec3::Vec3;

/// Upright cylinder anchored at its base.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    /// Center of the base disc
    pub base: Vec3,
    /// Height above (and tolerance below) the base
    pub height: f32,
    /// Horizontal radius
    pub radius: f32,
}

impl Cylinder {
    /// Create a cylinder.
    pub const fn new(base: Vec3, height: f32, radius: f32) -> Self {
        Self { base, height, radius }
    }

    /// `|y - base.y| <= height` and horizontal distance `<= radius`.
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        (point.y - self.base.y).abs() <= self.height
            && point.horizontal_distance_squared(self.base) <= self.radius * self.radius
    }
}

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Box center
    pub center: Vec3,
    /// Half size on each axis
    pub half_extents: Vec3,
}

impl Aabb {
    /// Create a box from center and half extents.
    pub const fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        let d = point - self.center;
        d.x.abs() <= self.half_extents.x
            && d.y.abs() <= self.half_extents.y
            && d.z.abs() <= self.half_extents.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_contains() {
        let zone = Cylinder::new(Vec3::new(10.0, 0.0, 10.0), 2.0, 5.0);

        assert!(zone.contains(Vec3::new(10.0, 0.0, 10.0)));
        assert!(zone.contains(Vec3::new(13.0, 1.5, 14.0))); // 3-4-5 edge
        assert!(zone.contains(Vec3::new(10.0, -2.0, 10.0)));
        assert!(!zone.contains(Vec3::new(10.0, 2.5, 10.0)));
        assert!(!zone.contains(Vec3::new(16.0, 0.0, 10.0)));
    }

    #[test]
    fn test_aabb_contains() {
        let base = Aabb::new(Vec3::ZERO, Vec3::new(4.0, 2.0, 4.0));

        assert!(base.contains(Vec3::new(4.0, 2.0, -4.0)));
        assert!(!base.contains(Vec3::new(4.1, 0.0, 0.0)));
        assert!(!base.contains(Vec3::new(0.0, -3.0, 0.0)));
    }
}
