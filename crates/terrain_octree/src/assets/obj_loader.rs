//! OBJ file loader for terrain meshes
//!
//! Only positions and faces are read; normals, texture coordinates,
//! groups and materials are skipped. Polygons are fan-triangulated.

use crate::foundation::math::Point3;
use crate::spatial::AABB;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// The file could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A number failed to parse
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What was wrong with the value
        message: String,
    },
    /// Structurally invalid statement, such as a bad face index
    #[error("Invalid format on line {line}: {message}")]
    InvalidFormat {
        /// 1-based line number
        line: usize,
        /// What was wrong with the statement
        message: String,
    },
}

/// Vertex positions and triangles of a terrain mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    /// Vertex positions in file order
    pub vertices: Vec<Point3>,
    /// Triangles as indices into `vertices`
    pub triangles: Vec<[usize; 3]>,
}

impl TerrainMesh {
    /// Tight bound of all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_points(&self.vertices)
    }

    /// Positions of one triangle
    ///
    /// `None` if the triangle or any of its vertex indices is out of range.
    pub fn triangle(&self, index: usize) -> Option<[Point3; 3]> {
        let [a, b, c] = *self.triangles.get(index)?;
        Some([
            *self.vertices.get(a)?,
            *self.vertices.get(b)?,
            *self.vertices.get(c)?,
        ])
    }

    /// Indices of triangles lying entirely inside `aabb`
    ///
    /// A triangle with any vertex outside the box is excluded.
    pub fn faces_inside(&self, aabb: &AABB) -> Vec<usize> {
        (0..self.triangles.len())
            .filter(|&i| self.triangle(i).is_some_and(|t| aabb.contains_all(&t)))
            .collect()
    }
}

/// Loader for Wavefront OBJ terrain files
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return its terrain mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<TerrainMesh, ObjError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mesh = Self::parse(BufReader::new(file))?;
        log::info!(
            "Loaded {}: {} vertices, {} triangles",
            path.display(),
            mesh.vertices.len(),
            mesh.triangles.len()
        );
        Ok(mesh)
    }

    /// Parse OBJ text from any buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<TerrainMesh, ObjError> {
        let mut mesh = TerrainMesh::default();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = number + 1;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => {
                    if parts.len() < 4 {
                        return Err(ObjError::InvalidFormat {
                            line: line_no,
                            message: "vertex needs three coordinates".to_string(),
                        });
                    }
                    let mut coords = [0.0f32; 3];
                    for (slot, value) in coords.iter_mut().zip(&parts[1..4]) {
                        *slot = value.parse().map_err(|_| ObjError::ParseError {
                            line: line_no,
                            message: format!("invalid vertex coordinate '{value}'"),
                        })?;
                    }
                    mesh.vertices.push(Point3::new(coords[0], coords[1], coords[2]));
                }
                "f" => {
                    if parts.len() < 4 {
                        return Err(ObjError::InvalidFormat {
                            line: line_no,
                            message: "face needs at least three vertices".to_string(),
                        });
                    }
                    let face = parts[1..]
                        .iter()
                        .map(|vertex| resolve_index(vertex, mesh.vertices.len(), line_no))
                        .collect::<Result<Vec<usize>, ObjError>>()?;

                    // Triangulate face (simple fan triangulation)
                    for i in 1..(face.len() - 1) {
                        mesh.triangles.push([face[0], face[i], face[i + 1]]);
                    }
                }
                _ => {}
            }
        }

        Ok(mesh)
    }

    /// Parse OBJ text held in memory
    pub fn parse_str(source: &str) -> Result<TerrainMesh, ObjError> {
        Self::parse(source.as_bytes())
    }
}

/// Resolve the position part of a face vertex (`v`, `v/vt`, `v//vn`, `v/vt/vn`)
///
/// OBJ indices are 1-based; negative indices count back from the most
/// recently defined vertex.
fn resolve_index(vertex: &str, vertex_count: usize, line: usize) -> Result<usize, ObjError> {
    let position = vertex.split('/').next().unwrap_or_default();
    let raw: i64 = position.parse().map_err(|_| ObjError::ParseError {
        line,
        message: format!("invalid face index '{vertex}'"),
    })?;

    let resolved = match raw {
        0 => None,
        r if r > 0 => usize::try_from(r - 1).ok(),
        r => usize::try_from(vertex_count as i64 + r).ok(),
    };

    resolved
        .filter(|&index| index < vertex_count)
        .ok_or_else(|| ObjError::InvalidFormat {
            line,
            message: format!("face index {raw} out of range for {vertex_count} vertices"),
        })
}
