//! Axis-aligned bounding box
//!
//! Boxes are stored as a `[min, max]` corner pair so the slab test can pick
//! the near corner of each axis by indexing with the ray's sign bits:
//!
//! Amy Williams, Steve Barrus, R. Keith Morley, and Peter Shirley,
//! "An Efficient and Robust Ray-Box Intersection Algorithm",
//! Journal of Graphics Tools, 10(1):49-54, 2005.

use crate::foundation::math::{point_max, point_min, Point3, Vec3};
use super::ray::Ray;

/// Axis-Aligned Bounding Box for spatial queries
///
/// Immutable once built. The `min <= max` invariant on every axis is a
/// caller precondition, checked only in debug builds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    corners: [Point3; 2],
}

impl Default for AABB {
    fn default() -> Self {
        Self::new(Point3::origin(), Point3::origin())
    }
}

impl AABB {
    /// Create a new AABB from min and max corners
    pub fn new(min: Point3, max: Point3) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "malformed AABB: min {min:?} exceeds max {max:?}"
        );
        Self { corners: [min, max] }
    }

    /// Create an AABB centered at a point with given half-extents
    pub fn from_center_extents(center: Point3, extents: Vec3) -> Self {
        Self::new(center - extents, center + extents)
    }

    /// Tight bound of a point set, `None` if the set is empty
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (point_min(&min, p), point_max(&max, p)));
        Some(Self::new(min, max))
    }

    /// Minimum corner
    pub fn min(&self) -> Point3 {
        self.corners[0]
    }

    /// Maximum corner
    pub fn max(&self) -> Point3 {
        self.corners[1]
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.corners[0], &self.corners[1])
    }

    /// Full edge lengths along each axis
    pub fn size(&self) -> Vec3 {
        self.corners[1] - self.corners[0]
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Check if this AABB contains a point (boundary inclusive)
    pub fn contains(&self, point: &Point3) -> bool {
        let (min, max) = (&self.corners[0], &self.corners[1]);
        point.x >= min.x && point.x <= max.x &&
        point.y >= min.y && point.y <= max.y &&
        point.z >= min.z && point.z <= max.z
    }

    /// True only if every point is contained
    ///
    /// All-or-nothing: a single point outside rejects the whole set. Callers
    /// that need partial containment test points one at a time.
    pub fn contains_all(&self, points: &[Point3]) -> bool {
        points.iter().all(|p| self.contains(p))
    }

    /// Strict overlap test on all three axes
    ///
    /// Boxes that only share a face, edge or corner do not overlap.
    pub fn overlaps(&self, other: &AABB) -> bool {
        let (a_min, a_max) = (&self.corners[0], &self.corners[1]);
        let (b_min, b_max) = (&other.corners[0], &other.corners[1]);
        a_min.x < b_max.x && b_min.x < a_max.x &&
        a_min.y < b_max.y && b_min.y < a_max.y &&
        a_min.z < b_max.z && b_min.z < a_max.z
    }

    /// Slab test: does the ray hit this box inside `[t_min, t_max]`?
    pub fn intersect_ray(&self, ray: &Ray, t_min: f32, t_max: f32) -> bool {
        self.slab_interval(ray)
            .is_some_and(|(near, far)| near < t_max && far > t_min)
    }

    /// Parametric interval `[near, far]` where the ray's line crosses the box
    ///
    /// `None` when the per-axis slab intervals do not intersect. The interval
    /// is not clipped to any query range; [`AABB::intersect_ray`] does that.
    /// Infinite reciprocal components (axis-parallel rays) flow through the
    /// comparisons unchanged.
    pub fn slab_interval(&self, ray: &Ray) -> Option<(f32, f32)> {
        let origin = &ray.origin;
        let inv = &ray.inverse_direction;
        let sign = &ray.sign;

        let mut t_near = (self.corners[sign[0]].x - origin.x) * inv.x;
        let mut t_far = (self.corners[1 - sign[0]].x - origin.x) * inv.x;

        let ty_near = (self.corners[sign[1]].y - origin.y) * inv.y;
        let ty_far = (self.corners[1 - sign[1]].y - origin.y) * inv.y;
        if t_near > ty_far || ty_near > t_far {
            return None;
        }
        if ty_near > t_near {
            t_near = ty_near;
        }
        if ty_far < t_far {
            t_far = ty_far;
        }

        let tz_near = (self.corners[sign[2]].z - origin.z) * inv.z;
        let tz_far = (self.corners[1 - sign[2]].z - origin.z) * inv.z;
        if t_near > tz_far || tz_near > t_far {
            return None;
        }
        if tz_near > t_near {
            t_near = tz_near;
        }
        if tz_far < t_far {
            t_far = tz_far;
        }

        Some((t_near, t_far))
    }

    /// Split into eight equal octants around the center
    ///
    /// Order: the four floor boxes walk min, +X, +X+Z, +Z; the four ceiling
    /// boxes repeat that walk in the upper half. Every child face is taken
    /// from the parent's `min`, `center` or `max`, so outer faces match the
    /// parent exactly and siblings share their split planes bit for bit.
    pub fn subdivide8(&self) -> [AABB; 8] {
        let (lo, mid, hi) = (self.min(), self.center(), self.max());
        let octant = |x: bool, y: bool, z: bool| {
            let pick = |upper: bool, l: f32, m: f32, h: f32| if upper { (m, h) } else { (l, m) };
            let (x0, x1) = pick(x, lo.x, mid.x, hi.x);
            let (y0, y1) = pick(y, lo.y, mid.y, hi.y);
            let (z0, z1) = pick(z, lo.z, mid.z, hi.z);
            AABB::new(Point3::new(x0, y0, z0), Point3::new(x1, y1, z1))
        };

        [
            octant(false, false, false),
            octant(true, false, false),
            octant(true, false, true),
            octant(false, false, true),
            octant(false, true, false),
            octant(true, true, false),
            octant(true, true, true),
            octant(false, true, true),
        ]
    }
}
