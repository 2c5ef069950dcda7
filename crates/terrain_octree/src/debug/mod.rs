//! Debug module for visualization geometry
//!
//! Produces line segments a renderer can draw; no drawing happens here.

pub mod draw;

pub use draw::{box_corners, box_edges, LineSegment, OctreeWireframe};
