//! Math utilities and types
//!
//! Provides the fundamental 3D types used by the spatial index, backed by
//! nalgebra, plus the two plane helpers used by picking code.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Tolerance used by [`ray_intersect_plane`] for both degenerate cases
pub const PLANE_EPSILON: f32 = 1.0e-9;

/// Intersect a ray with an infinite plane
///
/// Returns `None` when the ray origin already lies on the plane or when the
/// ray runs parallel to it. The direction does not need to be normalized.
/// Hits behind the origin are reported as well; callers that only want
/// forward hits must check the sign themselves.
///
/// # Arguments
/// * `origin` - Ray origin
/// * `direction` - Ray direction
/// * `plane_point` - Any point on the plane
/// * `plane_normal` - Plane normal
pub fn ray_intersect_plane(
    origin: &Point3,
    direction: &Vec3,
    plane_point: &Point3,
    plane_normal: &Vec3,
) -> Option<Point3> {
    let d1 = (plane_point - origin).dot(plane_normal);
    if d1.abs() < PLANE_EPSILON {
        return None;
    }

    let d2 = direction.dot(plane_normal);
    if d2.abs() < PLANE_EPSILON {
        return None;
    }

    Some(origin + direction * (d1 / d2))
}

/// Reflect `vector` about a surface with the given (unit) normal
pub fn reflect_vector(vector: &Vec3, normal: &Vec3) -> Vec3 {
    vector - normal * (2.0 * vector.dot(normal))
}

/// Component-wise minimum of two points
pub fn point_min(a: &Point3, b: &Point3) -> Point3 {
    Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

/// Component-wise maximum of two points
pub fn point_max(a: &Point3, b: &Point3) -> Point3 {
    Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}
