//! Wireframe geometry for octree boxes
//!
//! A renderer asks for the boxes of the first few levels (or just the
//! leaves) and turns each into twelve line segments.

use crate::foundation::math::Point3;
use crate::spatial::{Octree, AABB};

/// Line segment from start to end
pub type LineSegment = (Point3, Point3);

/// Corner index pairs forming the twelve edges of a box
///
/// Corners are numbered by bit: bit 0 = max X, bit 1 = max Y, bit 2 = max Z.
const EDGES: [(usize, usize); 12] = [
    (0, 1), (2, 3), (4, 5), (6, 7), // along X
    (0, 2), (1, 3), (4, 6), (5, 7), // along Y
    (0, 4), (1, 5), (2, 6), (3, 7), // along Z
];

/// The eight corners of a box
pub fn box_corners(aabb: &AABB) -> [Point3; 8] {
    let (min, max) = (aabb.min(), aabb.max());
    std::array::from_fn(|i| {
        Point3::new(
            if i & 1 != 0 { max.x } else { min.x },
            if i & 2 != 0 { max.y } else { min.y },
            if i & 4 != 0 { max.z } else { min.z },
        )
    })
}

/// The twelve edges of a box
pub fn box_edges(aabb: &AABB) -> [LineSegment; 12] {
    let corners = box_corners(aabb);
    EDGES.map(|(a, b)| (corners[a], corners[b]))
}

/// Boxes of an octree grouped for drawing
#[derive(Debug, Clone, Default)]
pub struct OctreeWireframe {
    /// `levels[d]` holds every node box at depth `d`
    pub levels: Vec<Vec<AABB>>,
}

impl OctreeWireframe {
    /// Collect node boxes for depths `0..num_levels`
    ///
    /// Stops early once a depth has no nodes.
    pub fn from_levels(tree: &Octree, num_levels: u32) -> Self {
        let mut levels = Vec::new();
        for depth in 0..num_levels {
            let boxes = tree.boxes_at_depth(depth);
            if boxes.is_empty() {
                break;
            }
            levels.push(boxes);
        }
        Self { levels }
    }

    /// Collect only leaf boxes, as a single level
    pub fn from_leaves(tree: &Octree) -> Self {
        Self {
            levels: vec![tree.leaf_boxes()],
        }
    }

    /// Total number of boxes over all levels
    pub fn box_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Line segments for one level, empty if the level does not exist
    pub fn level_segments(&self, level: usize) -> Vec<LineSegment> {
        self.levels
            .get(level)
            .map(|boxes| boxes.iter().flat_map(box_edges).collect())
            .unwrap_or_default()
    }

    /// Line segments for every level
    pub fn segments(&self) -> Vec<LineSegment> {
        self.levels
            .iter()
            .flatten()
            .flat_map(box_edges)
            .collect()
    }
}
