//! Terrain probes built on the octree queries
//!
//! These are the two questions a simulation step asks of the terrain: how
//! high above the ground is a position, and which terrain cells does a
//! moving bounding box touch. What to do with the answers (stepping back
//! velocity, flagging a landing) is left to the caller.

use crate::config::OctreeConfig;
use crate::foundation::math::{Point3, Vec3};
use super::aabb::AABB;
use super::octree::Octree;
use super::ray::Ray;

/// Result of a downward altimetry ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeSample {
    /// Index of the terrain point resolved from the hit leaf
    pub point_index: usize,
    /// Coordinates of that terrain point
    pub terrain_point: Point3,
    /// Distance from the probe position to the terrain point
    pub altitude: f32,
}

/// Leaf boxes touched by a bounding volume
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionReport {
    /// Overlapping leaf boxes
    pub boxes: Vec<AABB>,
    /// True when more boxes overlap than the configured threshold
    pub dense: bool,
}

impl CollisionReport {
    /// Number of overlapping leaf boxes
    pub fn count(&self) -> usize {
        self.boxes.len()
    }

    /// True if anything overlaps at all
    pub fn is_colliding(&self) -> bool {
        !self.boxes.is_empty()
    }
}

/// Cast a ray straight down from `position` and sample the terrain
///
/// Uses the tree's default last-hit traversal and resolves the hit leaf's
/// first point. Returns `None` when nothing below is hit.
pub fn altitude_sample(tree: &Octree, position: Point3, config: &OctreeConfig) -> Option<AltitudeSample> {
    let ray = Ray::new(position, Vec3::new(0.0, -1.0, 0.0));
    let leaf = tree.find_leaf(&ray, config.ray_t_min, config.ray_t_max)?;
    let point_index = leaf.first_point()?;
    let terrain_point = tree.point(point_index)?;

    Some(AltitudeSample {
        point_index,
        terrain_point,
        altitude: nalgebra::distance(&position, &terrain_point),
    })
}

/// Same as [`altitude_sample`] but using the nearest leaf below the position
pub fn nearest_altitude_sample(
    tree: &Octree,
    position: Point3,
    config: &OctreeConfig,
) -> Option<AltitudeSample> {
    let ray = Ray::new(position, Vec3::new(0.0, -1.0, 0.0));
    let hit = tree.find_nearest_leaf(&ray, config.ray_t_min, config.ray_t_max)?;
    let point_index = hit.leaf.first_point()?;
    let terrain_point = tree.point(point_index)?;

    Some(AltitudeSample {
        point_index,
        terrain_point,
        altitude: nalgebra::distance(&position, &terrain_point),
    })
}

/// Collect the leaf boxes a bounding volume overlaps
pub fn collision_report(tree: &Octree, bounds: &AABB, config: &OctreeConfig) -> CollisionReport {
    let boxes = tree.collect_overlapping_leaves(bounds);
    let dense = boxes.len() > config.dense_collision_threshold;
    if dense {
        log::debug!(
            "Dense terrain contact: {} leaf boxes overlap {:?}",
            boxes.len(),
            bounds
        );
    }

    CollisionReport { boxes, dense }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 4x4 grid of terrain points on a gentle slope
    ///
    /// Coordinates are dyadic so no point lands on a split plane.
    fn slope() -> Vec<Point3> {
        let mut points = Vec::new();
        for i in 0..4u8 {
            for k in 0..4u8 {
                let (fi, fk) = (f32::from(i), f32::from(k));
                points.push(Point3::new(fi * 3.0, 0.25 * fi + 0.125 * fk, fk * 3.0));
            }
        }
        points
    }

    #[test]
    fn test_altitude_above_terrain_point() {
        let points = slope();
        let tree = Octree::build(&points, 6);
        let config = OctreeConfig::default();

        // Directly above the point at grid (1, 2)
        let target = points[6];
        let position = Point3::new(target.x, 40.0, target.z);
        let sample = altitude_sample(&tree, position, &config).expect("should hit terrain");

        assert_eq!(sample.point_index, 6);
        assert_relative_eq!(sample.terrain_point, target);
        assert_relative_eq!(sample.altitude, 40.0 - target.y, epsilon = 1e-4);

        let nearest = nearest_altitude_sample(&tree, position, &config).unwrap();
        assert_eq!(nearest.point_index, 6);
    }

    #[test]
    fn test_altitude_misses_outside_terrain() {
        let tree = Octree::build(&slope(), 6);
        let config = OctreeConfig::default();
        assert!(altitude_sample(&tree, Point3::new(-50.0, 10.0, -50.0), &config).is_none());
    }

    #[test]
    fn test_altitude_respects_ray_range() {
        let points = slope();
        let tree = Octree::build(&points, 6);
        let config = OctreeConfig {
            ray_t_max: 5.0,
            ..OctreeConfig::default()
        };
        let target = points[6];
        let position = Point3::new(target.x, 100.0, target.z);
        assert!(altitude_sample(&tree, position, &config).is_none());
    }

    #[test]
    fn test_collision_report_threshold() {
        let tree = Octree::build(&slope(), 6);
        let everything = AABB::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(20.0, 20.0, 20.0));

        let strict = OctreeConfig {
            dense_collision_threshold: 3,
            ..OctreeConfig::default()
        };
        let report = collision_report(&tree, &everything, &strict);
        assert_eq!(report.count(), 16);
        assert!(report.is_colliding());
        assert!(report.dense);

        let lenient = OctreeConfig {
            dense_collision_threshold: 16,
            ..OctreeConfig::default()
        };
        assert!(!collision_report(&tree, &everything, &lenient).dense);

        let above = AABB::new(Point3::new(0.0, 30.0, 0.0), Point3::new(10.0, 35.0, 10.0));
        let clear = collision_report(&tree, &above, &strict);
        assert!(!clear.is_colliding());
        assert!(!clear.dense);
    }
}
