//! Minimal Wavefront OBJ reader: vertex positions and triangular faces.

use std::io::BufRead;
use std::path::Path;

use super::{Mesh, Triangle};
use crate::{point::Point, Error, Result};

impl<V: Point> Mesh<V> {
    /// Load a mesh from an OBJ file.
    /// See [`Mesh::from_obj_reader`].
    pub fn load_obj<P: AsRef<Path>>(path: P, strict: bool) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_obj_reader(std::io::BufReader::new(file), strict)
    }

    /// Parse a mesh from OBJ text.
    /// See [`Mesh::from_obj_reader`].
    pub fn from_obj_str(text: &str, strict: bool) -> Result<Self> {
        Self::from_obj_reader(text.as_bytes(), strict)
    }

    /// Parse a mesh from OBJ records.
    ///
    /// Only two records are read:
    /// - `v x y z`: a vertex position.
    /// - `f i j k`: a triangle with 1-based vertex references.
    ///   Only the first `/`-separated field of a reference is used, so `f 1/1/1 2/2/2 3/3/3` is valid.
    ///
    /// Blank lines, comments and other records (normals, texture coordinates, groups...) are skipped.
    /// Faces that are not triangles are rejected.
    ///
    /// In `strict` mode, the mesh must also be watertight: each edge must be shared by exactly two triangles.
    pub fn from_obj_reader<R: BufRead>(reader: R, strict: bool) -> Result<Self> {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        let mut min = V::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = V::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = i + 1;
            let mut tokens = line.split_whitespace();

            match tokens.next() {
                Some("v") => {
                    let vertex = parse_vertex::<V>(tokens, line_number)?;
                    min = min.comp_min(&vertex);
                    max = max.comp_max(&vertex);
                    vertices.push(vertex);
                }
                Some("f") => triangles.push(parse_face(tokens, line_number)?),
                _ => {}
            }
        }

        log::debug!(
            "[obj] read {} vertices and {} triangles",
            vertices.len(),
            triangles.len()
        );

        let mesh = Self::with_bounding_box(vertices, triangles, (min, max))?;
        if strict {
            mesh.check_watertight()?;
        }
        Ok(mesh)
    }
}

fn parse_vertex<'a, V: Point>(
    tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<V> {
    let coordinates = tokens
        .map(|token| match token.parse::<f32>() {
            Ok(coordinate) if coordinate.is_finite() => Ok(coordinate),
            Ok(_) => Err(Error::Parse {
                line,
                message: format!("non-finite coordinate `{token}`"),
            }),
            Err(e) => Err(Error::Parse {
                line,
                message: format!("invalid coordinate `{token}`: {e}"),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    match coordinates[..] {
        [x, y, z] => Ok(V::new(x, y, z)),
        _ => Err(Error::Parse {
            line,
            message: format!("expected 3 coordinates, found {}", coordinates.len()),
        }),
    }
}

fn parse_face<'a>(tokens: impl Iterator<Item = &'a str>, line: usize) -> Result<Triangle> {
    let references = tokens
        .map(|token| parse_reference(token, line))
        .collect::<Result<Vec<_>>>()?;

    match references[..] {
        [a, b, c] => Ok([a, b, c]),
        _ => Err(Error::NonTriangularFace { line }),
    }
}

/// Parse a 1-based vertex reference, `index[/texture[/normal]]`, into a 0-based index.
fn parse_reference(token: &str, line: usize) -> Result<u32> {
    let index = token.split('/').next().unwrap_or_default();
    match index.parse::<u32>() {
        Ok(index) if index > 0 => Ok(index - 1),
        _ => Err(Error::Parse {
            line,
            message: format!("invalid vertex reference `{token}`"),
        }),
    }
}
