//! Octree spatial partitioning structure
//!
//! Built once over a static point cloud (typically a terrain mesh's vertex
//! buffer) and queried many times. Each node owns a box and, while it is a
//! leaf, the indices of the source points it contains. Subdivision is a
//! uniform eight-way split around the box center; children are only created
//! for octants that receive at least one point.

use std::fmt;

use crate::foundation::math::{Point3, Vec3};
use super::aabb::AABB;
use super::ray::Ray;

/// Diagnostics gathered while building an [`Octree`]
///
/// A fresh report is produced by every build, so nothing carries over
/// between trees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Sum over all subdivisions of `parent points - points handed to children`
    ///
    /// Positive when points fall through the gaps of the split, negative
    /// when a point on a shared face is claimed by two children.
    pub stray_points: i64,
    /// Total number of nodes including the root
    pub node_count: usize,
    /// Number of nodes without children
    pub leaf_count: usize,
    /// Deepest node depth (root = 0)
    pub max_depth_reached: u32,
    /// Splits of zero-size nodes holding coincident points
    ///
    /// Each such split hands every point to all eight children, so the
    /// subtree grows by a factor of eight per level.
    pub degenerate_splits: usize,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} leaves, depth {}, {} stray points",
            self.node_count, self.leaf_count, self.max_depth_reached, self.stray_points
        )
    }
}

/// Copy of a leaf handed back to callers
#[derive(Debug, Clone, PartialEq)]
pub struct LeafInfo {
    /// Leaf box
    pub bounds: AABB,
    /// Indices into the tree's source points
    pub points: Vec<usize>,
    /// Depth of the leaf (root = 0)
    pub depth: u32,
}

impl LeafInfo {
    fn from_node(node: &TreeNode) -> Self {
        Self {
            bounds: node.bounds,
            points: node.points.clone(),
            depth: node.depth,
        }
    }

    /// First contained point index, used to resolve a terrain sample
    pub fn first_point(&self) -> Option<usize> {
        self.points.first().copied()
    }
}

/// Leaf selected by [`Octree::find_nearest_leaf`] with its entry parameter
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// Ray parameter where the ray enters the leaf, clipped to the query range
    pub t: f32,
    /// The leaf that was hit
    pub leaf: LeafInfo,
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Spatial extent of this node
    pub bounds: AABB,

    /// Source point indices; only leaves keep theirs after the build
    pub points: Vec<usize>,

    /// Owned children, at most eight, in octant order
    pub children: Vec<TreeNode>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl TreeNode {
    fn new(bounds: AABB, depth: u32, points: Vec<usize>) -> Self {
        Self {
            bounds,
            points,
            children: Vec::new(),
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Split this node's points among up to eight children, recursively
    fn subdivide(&mut self, source: &[Point3], max_depth: u32, report: &mut BuildReport) {
        let level = self.depth + 1;
        if level >= max_depth {
            return;
        }

        if self.bounds.size() == Vec3::zeros() {
            report.degenerate_splits += 1;
        }

        let mut distributed = 0usize;
        for bounds in self.bounds.subdivide8() {
            let contained: Vec<usize> = self
                .points
                .iter()
                .copied()
                .filter(|&index| bounds.contains(&source[index]))
                .collect();

            if contained.is_empty() {
                continue;
            }
            distributed += contained.len();

            let mut child = TreeNode::new(bounds, level, contained);
            // A single point cannot be separated any further
            if child.points.len() > 1 {
                child.subdivide(source, max_depth, report);
            }
            self.children.push(child);
        }

        let missing = self.points.len() as i64 - distributed as i64;
        if missing != 0 {
            log::trace!(
                "Node at depth {} redistributed {} of {} points",
                self.depth,
                distributed,
                self.points.len()
            );
        }
        report.stray_points += missing;

        if !self.children.is_empty() {
            self.points.clear();
        }
    }

    /// Depth-first ray query where every intersected leaf replaces the last
    ///
    /// Returns true if any leaf below this node was hit.
    pub fn query_ray_last<'a>(
        &'a self,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
        found: &mut Option<&'a TreeNode>,
    ) -> bool {
        if !self.bounds.intersect_ray(ray, t_min, t_max) {
            return false;
        }

        if self.is_leaf() {
            *found = Some(self);
            return true;
        }

        let mut hit = false;
        for child in &self.children {
            hit |= child.query_ray_last(ray, t_min, t_max, found);
        }
        hit
    }

    /// Depth-first ray query keeping the leaf with the smallest entry parameter
    ///
    /// Subtrees whose entry parameter is not below the current best are
    /// skipped, so ties resolve to the leaf visited first.
    pub fn query_ray_nearest<'a>(
        &'a self,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
        best: &mut Option<(f32, &'a TreeNode)>,
    ) {
        let Some((near, far)) = self.bounds.slab_interval(ray) else {
            return;
        };
        if !(near < t_max && far > t_min) {
            return;
        }

        let entry = near.max(t_min);
        if best.is_some_and(|(best_t, _)| entry >= best_t) {
            return;
        }

        if self.is_leaf() {
            *best = Some((entry, self));
            return;
        }

        for child in &self.children {
            child.query_ray_nearest(ray, t_min, t_max, best);
        }
    }

    /// Collect every leaf whose box strictly overlaps `query`
    ///
    /// Children are always visited; the overlap test at the top of each call
    /// does the pruning.
    pub fn query_overlapping<'a>(&'a self, query: &AABB, leaves: &mut Vec<&'a TreeNode>) -> bool {
        if !self.bounds.overlaps(query) {
            return false;
        }

        if self.is_leaf() {
            leaves.push(self);
            return true;
        }

        let mut hit = false;
        for child in &self.children {
            hit |= child.query_overlapping(query, leaves);
        }
        hit
    }

    /// Get all leaf nodes (for visualization)
    pub fn get_all_leaves<'a>(&'a self, leaves: &mut Vec<&'a TreeNode>) {
        if self.is_leaf() {
            leaves.push(self);
        } else {
            for child in &self.children {
                child.get_all_leaves(leaves);
            }
        }
    }

    /// Get all nodes at a specific depth (for visualization)
    pub fn get_nodes_at_depth<'a>(&'a self, target_depth: u32, nodes: &mut Vec<&'a TreeNode>) {
        if self.depth == target_depth {
            nodes.push(self);
        } else if self.depth < target_depth {
            for child in &self.children {
                child.get_nodes_at_depth(target_depth, nodes);
            }
        }
    }

    /// Count this node and all descendants
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count_nodes).sum::<usize>()
    }

    /// Count leaves in this subtree
    pub fn count_leaves(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(TreeNode::count_leaves).sum()
        }
    }

    /// Count point indices held by leaves in this subtree
    pub fn count_leaf_points(&self) -> usize {
        if self.is_leaf() {
            self.points.len()
        } else {
            self.children.iter().map(TreeNode::count_leaf_points).sum()
        }
    }

    /// Depth of the deepest node in this subtree
    pub fn deepest(&self) -> u32 {
        self.children
            .iter()
            .map(TreeNode::deepest)
            .max()
            .unwrap_or(self.depth)
    }
}

/// Octree over a static point cloud
#[derive(Debug, Clone)]
pub struct Octree {
    /// Root node, bounding the entire point set
    root: TreeNode,

    /// Source points that node indices refer to
    points: Vec<Point3>,

    /// Subdivision limit used at construction
    max_depth: u32,

    /// Diagnostics from construction
    report: BuildReport,
}

impl Default for Octree {
    fn default() -> Self {
        Self::build(&[], 0)
    }
}

impl Octree {
    /// Build an octree over `points`
    ///
    /// The root box is the tight bound of the input. Subdivision stops when
    /// the next level would reach `max_depth`, or when a node holds a single
    /// point. With `max_depth <= 1` or no points the tree is a single leaf.
    pub fn build(points: &[Point3], max_depth: u32) -> Self {
        let bounds = AABB::from_points(points).unwrap_or_default();
        let mut root = TreeNode::new(bounds, 0, (0..points.len()).collect());
        let mut report = BuildReport::default();

        if points.len() > 1 {
            root.subdivide(points, max_depth, &mut report);
        }

        report.node_count = root.count_nodes();
        report.leaf_count = root.count_leaves();
        report.max_depth_reached = root.deepest();

        log::info!(
            "Octree built over {} points with max depth {}: {}",
            points.len(),
            max_depth,
            report
        );
        if report.stray_points != 0 {
            log::warn!(
                "Octree redistribution lost or duplicated {} points on split boundaries",
                report.stray_points
            );
        }
        if report.degenerate_splits != 0 {
            log::warn!(
                "Octree split {} zero-size nodes of coincident points; node count grows eightfold per level",
                report.degenerate_splits
            );
        }

        Self {
            root,
            points: points.to_vec(),
            max_depth,
            report,
        }
    }

    /// Root node
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Source points the tree was built from
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Resolve a point index from a query result
    pub fn point(&self, index: usize) -> Option<Point3> {
        self.points.get(index).copied()
    }

    /// Subdivision limit the tree was built with
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Diagnostics from construction
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// True when the tree was built from no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ray query keeping the last intersected leaf in traversal order
    ///
    /// All children are visited in octant order and every leaf the ray
    /// hits within `[t_min, t_max]` replaces the previous candidate. The
    /// result is therefore not necessarily the nearest leaf; use
    /// [`Octree::find_nearest_leaf`] for that.
    pub fn find_leaf(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<LeafInfo> {
        if self.is_empty() {
            return None;
        }

        let mut found = None;
        self.root.query_ray_last(ray, t_min, t_max, &mut found);
        found.map(LeafInfo::from_node)
    }

    /// Ray query returning the leaf entered first along the ray
    ///
    /// The entry parameter is clipped to `t_min`, so leaves containing the
    /// ray origin report `t_min`. Ties go to the leaf earlier in octant order.
    pub fn find_nearest_leaf(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<RayHit> {
        if self.is_empty() {
            return None;
        }

        let mut best = None;
        self.root.query_ray_nearest(ray, t_min, t_max, &mut best);
        best.map(|(t, node)| RayHit {
            t,
            leaf: LeafInfo::from_node(node),
        })
    }

    /// Boxes of every leaf strictly overlapping `query`
    pub fn collect_overlapping_leaves(&self, query: &AABB) -> Vec<AABB> {
        self.overlapping_nodes(query)
            .into_iter()
            .map(|node| node.bounds)
            .collect()
    }

    /// Like [`Octree::collect_overlapping_leaves`] but with each leaf's points
    pub fn overlapping_leaves(&self, query: &AABB) -> Vec<LeafInfo> {
        self.overlapping_nodes(query)
            .into_iter()
            .map(LeafInfo::from_node)
            .collect()
    }

    fn overlapping_nodes(&self, query: &AABB) -> Vec<&TreeNode> {
        let mut leaves = Vec::new();
        if !self.is_empty() {
            self.root.query_overlapping(query, &mut leaves);
        }
        leaves
    }

    /// Every leaf with its points
    pub fn leaves(&self) -> Vec<LeafInfo> {
        let mut leaves = Vec::new();
        self.root.get_all_leaves(&mut leaves);
        leaves.into_iter().map(LeafInfo::from_node).collect()
    }

    /// Get all leaf boxes (for visualization)
    pub fn leaf_boxes(&self) -> Vec<AABB> {
        let mut leaves = Vec::new();
        self.root.get_all_leaves(&mut leaves);
        leaves.into_iter().map(|node| node.bounds).collect()
    }

    /// Get the boxes of all nodes at a specific depth (for visualization)
    pub fn boxes_at_depth(&self, depth: u32) -> Vec<AABB> {
        let mut nodes = Vec::new();
        self.root.get_nodes_at_depth(depth, &mut nodes);
        nodes.into_iter().map(|node| node.bounds).collect()
    }

    /// Total number of point indices held by leaves
    pub fn leaf_point_count(&self) -> usize {
        self.root.count_leaf_points()
    }
}
