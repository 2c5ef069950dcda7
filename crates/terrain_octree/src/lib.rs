//! # Terrain Octree
//!
//! A static octree over a terrain point cloud, with the ray/box and box/box
//! tests a lander simulation needs once per frame.
//!
//! ## Features
//!
//! - **Octree**: built once from a vertex list, eight-way uniform splits
//! - **Ray Queries**: robust slab test, safe for axis-parallel rays
//! - **Box Queries**: every terrain leaf overlapping a moving bounding box
//! - **Probes**: altimetry samples and collision reports
//! - **OBJ Adapter**: vertex and face extraction from Wavefront files
//!
//! ## Quick Start
//!
//! ```rust
//! use terrain_octree::prelude::*;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.0, 0.0, 0.1),
//!     Point3::new(5.0, 5.0, 5.0),
//!     Point3::new(5.0, 5.0, 5.1),
//!     Point3::new(9.0, 9.0, 9.0),
//! ];
//! let tree = Octree::build(&points, 4);
//!
//! let probe = AABB::new(Point3::new(4.0, 4.0, 4.0), Point3::new(6.0, 6.0, 6.0));
//! assert_eq!(tree.collect_overlapping_leaves(&probe).len(), 1);
//!
//! let ray = Ray::new(Point3::new(8.5, 20.0, 8.5), Vec3::new(0.0, -1.0, 0.0));
//! let leaf = tree.find_leaf(&ray, 0.0, 100.0).unwrap();
//! assert_eq!(leaf.first_point(), Some(4));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod spatial;
pub mod assets;
pub mod config;
pub mod debug;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        foundation::math::{Point3, Vec3},
        spatial::{
            AABB, Ray, Octree, TreeNode, LeafInfo, RayHit, BuildReport,
            probe::{altitude_sample, nearest_altitude_sample, collision_report, AltitudeSample, CollisionReport},
        },
        assets::{ObjLoader, ObjError, TerrainMesh},
        config::{Config, ConfigError, OctreeConfig},
        debug::OctreeWireframe,
    };
}
