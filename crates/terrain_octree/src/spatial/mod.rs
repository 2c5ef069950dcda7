//! Spatial partitioning data structures
//!
//! Provides the static terrain octree together with the box and ray
//! primitives its queries are built from.

mod aabb;
mod octree;
mod ray;
pub mod probe;

#[cfg(test)]
mod scenarios;

pub use aabb::AABB;
pub use octree::{BuildReport, LeafInfo, Octree, RayHit, TreeNode};
pub use ray::Ray;
