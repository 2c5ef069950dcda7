//! Geometry adapter
//!
//! Turns mesh files into the flat point list the octree is built from.

pub mod obj_loader;

pub use obj_loader::{ObjError, ObjLoader, TerrainMesh};
