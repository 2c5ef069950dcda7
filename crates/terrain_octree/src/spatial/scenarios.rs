//! End-to-end scenarios across the box, ray and octree modules

use crate::foundation::math::{Point3, Vec3};
use super::{AABB, Octree, Ray};

fn five_points() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 0.1),
        Point3::new(5.0, 5.0, 5.0),
        Point3::new(5.0, 5.0, 5.1),
        Point3::new(9.0, 9.0, 9.0),
    ]
}

/// Deterministic scatter inside `[0, 100]^3`
///
/// Two anchor points pin the root box to exactly `[0, 100]^3`, so every
/// split plane is an even multiple of 100/1024 while scattered coordinates
/// are odd multiples: no point ever lies on a split.
fn scatter(count: usize) -> Vec<Point3> {
    let mut state = 0x2545_f491_u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        ((state % 512) * 2 + 1) as f32 / 1024.0 * 100.0
    };

    let mut points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(100.0, 100.0, 100.0)];
    points.extend((0..count).map(|_| Point3::new(next(), next(), next())));
    points
}

#[test]
fn test_box_query_finds_single_cluster_leaf() {
    let points = five_points();
    let tree = Octree::build(&points, 4);
    let query = AABB::new(Point3::new(4.0, 4.0, 4.0), Point3::new(6.0, 6.0, 6.0));

    let leaves = tree.overlapping_leaves(&query);
    assert_eq!(leaves.len(), 1);

    let mut contained: Vec<Point3> = leaves[0].points.iter().map(|&i| points[i]).collect();
    contained.sort_by(|a, b| a.z.total_cmp(&b.z));
    assert_eq!(contained, vec![points[2], points[3]]);

    assert_eq!(tree.collect_overlapping_leaves(&query), vec![leaves[0].bounds]);
}

#[test]
fn test_build_is_idempotent() {
    let points = scatter(400);
    let first = Octree::build(&points, 6);
    let second = Octree::build(&points, 6);

    assert_eq!(first.report(), second.report());
    assert_eq!(first.leaf_boxes(), second.leaf_boxes());
    assert_eq!(first.leaf_point_count(), second.leaf_point_count());
}

#[test]
fn test_every_point_reaches_exactly_one_leaf() {
    let points = scatter(400);
    let tree = Octree::build(&points, 6);
    assert_eq!(tree.report().stray_points, 0);

    let mut seen = vec![0usize; points.len()];
    for leaf in tree.leaves() {
        for &index in &leaf.points {
            assert!(leaf.bounds.contains(&points[index]));
            seen[index] += 1;
        }
    }
    assert!(seen.iter().all(|&count| count == 1));
}

/// Jittered height field with arbitrary decimal coordinates
///
/// The outermost vertices define the root box, so each root face holds at
/// least one point.
fn jittered_terrain() -> Vec<Point3> {
    let mut points = Vec::new();
    for i in 0..25u8 {
        for k in 0..25u8 {
            let (fi, fk) = (f32::from(i), f32::from(k));
            let x = -50.3117 + fi * 4.1913 + 0.37 * (fk * 0.9).sin();
            let z = -50.2871 + fk * 4.1906 + 0.29 * (fi * 1.3).cos();
            let y = 3.1 * (x * 0.071).sin() * (z * 0.053).cos() - 0.4177;
            points.push(Point3::new(x, y, z));
        }
    }
    points
}

#[test]
fn test_points_on_outer_faces_are_kept() {
    let points = jittered_terrain();
    let tree = Octree::build(&points, 10);
    let root = tree.root().bounds;
    assert!(points.iter().any(|p| p.z == root.max().z));
    assert!(points.iter().any(|p| p.x == root.max().x));
    assert_eq!(tree.report().stray_points, 0);
    assert_eq!(tree.leaf_point_count(), points.len());

    let mut seen = vec![0usize; points.len()];
    for leaf in tree.leaves() {
        for &index in &leaf.points {
            seen[index] += 1;
        }
    }
    assert!(seen.iter().all(|&count| count == 1));
}

#[test]
fn test_leaf_boxes_never_overlap_each_other() {
    let tree = Octree::build(&scatter(200), 5);
    let boxes = tree.leaf_boxes();
    for (i, a) in boxes.iter().enumerate() {
        for b in boxes.iter().skip(i + 1) {
            assert!(!a.overlaps(b));
        }
    }
}

#[test]
fn test_box_query_agrees_with_brute_force() {
    let tree = Octree::build(&scatter(300), 5);
    let query = AABB::new(Point3::new(20.0, 10.0, 30.0), Point3::new(55.0, 70.0, 48.0));

    let mut expected: Vec<AABB> = tree
        .leaf_boxes()
        .into_iter()
        .filter(|leaf| leaf.overlaps(&query))
        .collect();
    let mut found = tree.collect_overlapping_leaves(&query);

    let key = |b: &AABB| (b.min().x.to_bits(), b.min().y.to_bits(), b.min().z.to_bits());
    expected.sort_by_key(key);
    found.sort_by_key(key);
    assert_eq!(found, expected);
}

#[test]
fn test_ray_hits_match_brute_force() {
    let tree = Octree::build(&scatter(300), 5);
    let ray = Ray::new(Point3::new(-10.0, 50.3, 40.7), Vec3::new(1.0, 0.05, 0.1));

    let hit_leaves: Vec<AABB> = tree
        .leaf_boxes()
        .into_iter()
        .filter(|leaf| leaf.intersect_ray(&ray, 0.0, 1000.0))
        .collect();

    match tree.find_leaf(&ray, 0.0, 1000.0) {
        Some(leaf) => assert_eq!(Some(&leaf.bounds), hit_leaves.last()),
        None => assert!(hit_leaves.is_empty()),
    }

    let nearest = tree.find_nearest_leaf(&ray, 0.0, 1000.0);
    let expected_t = hit_leaves
        .iter()
        .filter_map(|leaf| leaf.slab_interval(&ray))
        .map(|(near, _)| near.max(0.0))
        .fold(f32::INFINITY, f32::min);
    match nearest {
        Some(hit) => assert!((hit.t - expected_t).abs() < 1e-4),
        None => assert!(hit_leaves.is_empty()),
    }
}

#[test]
fn test_axis_parallel_ray_through_tree() {
    let points = five_points();
    let tree = Octree::build(&points, 4);
    // Straight down through the (5, 5, 5) cluster; x and z reciprocals are infinite
    let ray = Ray::new(Point3::new(5.0, 30.0, 5.05), Vec3::new(0.0, -1.0, 0.0));

    let leaf = tree.find_leaf(&ray, 0.0, 100.0).expect("cluster leaf should be hit");
    assert!(leaf.points.contains(&2));
    assert!(leaf.points.contains(&3));
}
