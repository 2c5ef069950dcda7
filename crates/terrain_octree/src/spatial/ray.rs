//! Ray with precomputed slab-test data

use crate::foundation::math::{Point3, Vec3};

/// A ray for altimetry and picking queries
///
/// The direction is kept as given (not normalized), so the parametric `t`
/// of a hit is measured in units of `direction`. A zero direction component
/// produces an infinite reciprocal on that axis, which the slab test relies
/// on; it must not be replaced by an epsilon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Point3,
    /// The direction of the ray as supplied by the caller
    pub direction: Vec3,
    /// Component-wise `1 / direction`, possibly infinite
    pub inverse_direction: Vec3,
    /// `1` where the inverse direction is negative, `0` otherwise
    pub sign: [usize; 3],
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let inverse_direction = Vec3::new(
            1.0 / direction.x,
            1.0 / direction.y,
            1.0 / direction.z,
        );
        let sign = [
            usize::from(inverse_direction.x < 0.0),
            usize::from(inverse_direction.y < 0.0),
            usize::from(inverse_direction.z < 0.0),
        ];

        Self {
            origin,
            direction,
            inverse_direction,
            sign,
        }
    }

    /// Get the point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Point3 {
        self.origin + self.direction * t
    }
}
