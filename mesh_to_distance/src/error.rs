//! Error type shared by every stage of the conversion.

use core::fmt;

/// Errors raised while loading a mesh, configuring a grid,
/// evaluating the distance field or quantizing it.
#[derive(Debug)]
pub enum Error {
    /// The geometry could not be read.
    Io(std::io::Error),
    /// A vertex or face record is malformed.
    /// `line` is 1-based.
    Parse {
        /// Line of the record.
        line: usize,
        /// What went wrong.
        message: String,
    },
    /// A face record does not have exactly three vertex references.
    NonTriangularFace {
        /// Line of the record.
        line: usize,
    },
    /// A triangle references a vertex that does not exist.
    InvalidIndex {
        /// Index of the triangle.
        triangle: usize,
        /// The offending 0-based vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// The mesh has no vertex or no triangle.
    EmptyMesh,
    /// A vertex has a NaN or infinite coordinate.
    NonFiniteVertex {
        /// Index of the vertex.
        vertex: usize,
    },
    /// Strict loading found an edge not shared by exactly two triangles.
    NotWatertight {
        /// The offending undirected edge, smallest index first.
        edge: [u32; 2],
        /// How many triangles use this edge.
        count: usize,
    },
    /// A zero-area triangle was met while evaluating distances.
    DegenerateTriangle {
        /// Index of the triangle.
        triangle: usize,
    },
    /// The grid cannot be sampled.
    InvalidGrid(String),
    /// Every sample of the field has the same value, so it cannot be normalized.
    FlatField {
        /// The single value of the field.
        value: f32,
    },
    /// The evaluation was cancelled by the caller.
    Cancelled,
}

/// Result type of the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read mesh: {e}"),
            Self::Parse { line, message } => write!(f, "line {line}: {message}"),
            Self::NonTriangularFace { line } => {
                write!(f, "line {line}: only triangular faces supported")
            }
            Self::InvalidIndex {
                triangle,
                index,
                vertex_count,
            } => write!(
                f,
                "triangle {triangle} references vertex {index} but the mesh has {vertex_count} vertices"
            ),
            Self::EmptyMesh => write!(f, "mesh has no vertices or no triangles"),
            Self::NonFiniteVertex { vertex } => {
                write!(f, "vertex {vertex} has a non-finite coordinate")
            }
            Self::NotWatertight { edge, count } => write!(
                f,
                "mesh is not watertight: edge ({}, {}) is used by {count} triangle(s)",
                edge[0], edge[1]
            ),
            Self::DegenerateTriangle { triangle } => {
                write!(f, "triangle {triangle} has a zero area")
            }
            Self::InvalidGrid(reason) => write!(f, "invalid grid: {reason}"),
            Self::FlatField { value } => {
                write!(f, "cannot normalize a field where every sample is {value}")
            }
            Self::Cancelled => write!(f, "evaluation cancelled"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse { .. }
            | Self::NonTriangularFace { .. }
            | Self::InvalidIndex { .. }
            | Self::EmptyMesh
            | Self::NonFiniteVertex { .. }
            | Self::NotWatertight { .. }
            | Self::DegenerateTriangle { .. }
            | Self::InvalidGrid(_)
            | Self::FlatField { .. }
            | Self::Cancelled => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
