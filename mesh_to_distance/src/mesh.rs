//! Indexed triangle mesh.

pub mod consistency;
mod obj;

use itertools::Itertools;

use crate::{point::Point, Error, Result};

pub use consistency::ConsistencyWarning;

/// A triangle is three indices in the vertex list of its mesh.
/// The order of the indices defines the winding, hence the normal direction.
pub type Triangle = [u32; 3];

/// Triangle mesh: vertices, triangles indexing them, and their bounding box.
///
/// Every triangle index is guaranteed to be valid,
/// and the mesh always has at least one vertex and one triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<V: Point = [f32; 3]> {
    vertices: Vec<V>,
    triangles: Vec<Triangle>,
    bounding_box: (V, V),
}

impl<V: Point> Mesh<V> {
    /// Create a mesh from its vertices and triangles.
    ///
    /// Fails if the mesh is empty, if a vertex is not finite
    /// or if a triangle references a missing vertex.
    pub fn new(vertices: Vec<V>, triangles: Vec<Triangle>) -> Result<Self> {
        let bounding_box = vertices
            .iter()
            .fold(None, |bounds: Option<(V, V)>, v| match bounds {
                None => Some((*v, *v)),
                Some((min, max)) => Some((min.comp_min(v), max.comp_max(v))),
            })
            .ok_or(Error::EmptyMesh)?;

        Self::with_bounding_box(vertices, triangles, bounding_box)
    }

    /// Create a mesh whose bounding box was computed while streaming the vertices.
    fn with_bounding_box(
        vertices: Vec<V>,
        triangles: Vec<Triangle>,
        bounding_box: (V, V),
    ) -> Result<Self> {
        if vertices.is_empty() || triangles.is_empty() {
            return Err(Error::EmptyMesh);
        }

        if let Some(vertex) = vertices
            .iter()
            .position(|v| !(v.x().is_finite() && v.y().is_finite() && v.z().is_finite()))
        {
            return Err(Error::NonFiniteVertex { vertex });
        }

        let vertex_count = vertices.len();
        if let Some((triangle, &index)) = triangles
            .iter()
            .enumerate()
            .flat_map(|(i, t)| t.iter().map(move |index| (i, index)))
            .find(|&(_, &index)| index as usize >= vertex_count)
        {
            return Err(Error::InvalidIndex {
                triangle,
                index,
                vertex_count,
            });
        }

        Ok(Self {
            vertices,
            triangles,
            bounding_box,
        })
    }

    /// Get the vertices.
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Get the triangles.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Get the positions of the three vertices of a triangle.
    pub fn triangle_vertices(&self, triangle: usize) -> (&V, &V, &V) {
        let [a, b, c] = self.triangles[triangle];
        (
            &self.vertices[a as usize],
            &self.vertices[b as usize],
            &self.vertices[c as usize],
        )
    }

    /// Get the bounding box of the vertices as `(min, max)`.
    pub fn bounding_box(&self) -> (V, V) {
        self.bounding_box
    }

    /// Make sure every undirected edge is shared by exactly two triangles.
    pub fn check_watertight(&self) -> Result<()> {
        match self
            .triangles
            .iter()
            .flat_map(|&[a, b, c]| [[a, b], [b, c], [c, a]])
            .map(|[a, b]| [a.min(b), a.max(b)])
            .counts()
            .into_iter()
            .filter(|&(_, count)| count != 2)
            .min()
        {
            Some((edge, count)) => Err(Error::NotWatertight { edge, count }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Closed tetrahedron with outward counter-clockwise faces.
    pub(crate) fn tetrahedron() -> Mesh {
        Mesh::load_obj("assets/tetrahedron.obj", true).unwrap()
    }

    /// Watertight sphere made by projecting a subdivided cube on a sphere.
    /// It has `12 * subdivisions^2` outward counter-clockwise triangles.
    pub(crate) fn cube_sphere(subdivisions: i32, radius: f32) -> Mesh {
        let n = subdivisions;
        // (origin, u, v) for each face, with cross(u, v) pointing outside.
        let faces: [([i32; 3], [i32; 3], [i32; 3]); 6] = [
            ([0, 0, 0], [0, 1, 0], [1, 0, 0]),
            ([0, 0, n], [1, 0, 0], [0, 1, 0]),
            ([0, 0, 0], [0, 0, 1], [0, 1, 0]),
            ([n, 0, 0], [0, 1, 0], [0, 0, 1]),
            ([0, 0, 0], [1, 0, 0], [0, 0, 1]),
            ([0, n, 0], [0, 0, 1], [1, 0, 0]),
        ];

        let mut lattice = std::collections::HashMap::new();
        let mut vertices = Vec::new();
        let mut vertex = |p: [i32; 3]| -> u32 {
            *lattice.entry(p).or_insert_with(|| {
                let half = n as f32 / 2.0;
                let centered = [p[0] as f32 - half, p[1] as f32 - half, p[2] as f32 - half];
                vertices.push(centered.normalize().mul(radius));
                vertices.len() as u32 - 1
            })
        };

        let mut triangles = Vec::new();
        for (origin, u, v) in faces {
            let at = |i: i32, j: i32| {
                [
                    origin[0] + i * u[0] + j * v[0],
                    origin[1] + i * u[1] + j * v[1],
                    origin[2] + i * u[2] + j * v[2],
                ]
            };
            for (i, j) in itertools::iproduct!(0..n, 0..n) {
                let p00 = vertex(at(i, j));
                let p10 = vertex(at(i + 1, j));
                let p11 = vertex(at(i + 1, j + 1));
                let p01 = vertex(at(i, j + 1));
                triangles.push([p00, p10, p11]);
                triangles.push([p00, p11, p01]);
            }
        }

        Mesh::new(vertices, triangles).unwrap()
    }

    #[test]
    fn test_new() {
        let mesh = Mesh::new(
            vec![[0., 1., 0.], [1., 2., 3.], [-1., 3., 4.]],
            vec![[0, 1, 2]],
        )
        .unwrap();
        assert_eq!(mesh.bounding_box(), ([-1., 1., 0.], [1., 3., 4.]));
        assert_eq!(mesh.triangle_vertices(0).2, &[-1., 3., 4.]);
    }

    #[test]
    fn test_new_invalid() {
        assert!(matches!(
            Mesh::<[f32; 3]>::new(vec![], vec![[0, 1, 2]]),
            Err(Error::EmptyMesh)
        ));
        assert!(matches!(
            Mesh::new(vec![[0., 0., 0.]], vec![]),
            Err(Error::EmptyMesh)
        ));
        assert!(matches!(
            Mesh::new(vec![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]], vec![[0, 1, 3]]),
            Err(Error::InvalidIndex {
                triangle: 0,
                index: 3,
                vertex_count: 3
            })
        ));
    }

    #[test]
    fn test_new_non_finite() {
        let triangles = vec![[0, 1, 2]];
        assert!(matches!(
            Mesh::new(
                vec![[0., 0., 0.], [f32::INFINITY, 0., 0.], [0., 1., 0.]],
                triangles.clone()
            ),
            Err(Error::NonFiniteVertex { vertex: 1 })
        ));
        assert!(matches!(
            Mesh::new(vec![[0., 0., 0.], [1., 0., 0.], [0., 1., f32::NAN]], triangles),
            Err(Error::NonFiniteVertex { vertex: 2 })
        ));
    }

    #[test]
    fn test_watertight() {
        tetrahedron().check_watertight().unwrap();
        cube_sphere(3, 1.0).check_watertight().unwrap();

        // A lone triangle has three open edges.
        let mesh = Mesh::new(
            vec![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]],
            vec![[0, 1, 2]],
        )
        .unwrap();
        assert!(matches!(
            mesh.check_watertight(),
            Err(Error::NotWatertight {
                edge: [0, 1],
                count: 1
            })
        ));
    }

    #[test]
    fn test_cube_sphere() {
        let mesh = cube_sphere(4, 2.0);
        assert_eq!(mesh.triangles().len(), 12 * 16);
        // 6 faces of 5x5 points, minus the shared edges and corners.
        assert_eq!(mesh.vertices().len(), 6 * 16 + 2);
        for v in mesh.vertices() {
            float_cmp::assert_approx_eq!(f32, v.length(), 2.0, epsilon = 1e-5);
        }
        assert!(mesh.check_consistency().is_empty());
    }
}
