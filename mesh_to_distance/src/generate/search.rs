//! Nearest surface search.
//!
//! The indexed search visits the samples around the query in growing shells
//! (cubes of Chebyshev radius `k`), only looking at the ring added by each shell.
//! It stops as soon as no unvisited triangle can be closer than the best one found.

use itertools::Either;

use crate::{compare_distances, geo, Error, Grid, Mesh, Point, Result};

use super::triangle_lists::TriangleLists;

/// Set of the triangles already evaluated by a query.
///
/// Allocated once per worker and cleared in constant time between queries:
/// a triangle is visited when its stamp equals the current generation.
#[derive(Debug, Clone)]
pub struct VisitedTriangles {
    stamps: Vec<u32>,
    generation: u32,
}

impl VisitedTriangles {
    /// Create an empty set for a mesh of `triangle_count` triangles.
    pub fn new(triangle_count: usize) -> Self {
        Self {
            stamps: vec![0; triangle_count],
            generation: 1,
        }
    }

    /// Forget every visited triangle.
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Stamps from older generations would alias after the wrap.
            self.stamps.fill(0);
            self.generation = 1;
        }
    }

    /// Mark a triangle as visited.
    /// Returns `false` if it was already visited.
    pub fn insert(&mut self, triangle: usize) -> bool {
        let stamp = &mut self.stamps[triangle];
        if *stamp == self.generation {
            false
        } else {
            *stamp = self.generation;
            true
        }
    }
}

/// Signed distance from `point` to the nearest triangle, using the spatial index.
///
/// `point` must be the position of the sample `cell`.
/// `visited` is scratch memory sized for the mesh, cleared by this function.
///
/// Gives the same result as [`distance_brute_force`].
pub fn distance_using_index<V: Point>(
    mesh: &Mesh<V>,
    grid: &Grid<V>,
    lists: &TriangleLists,
    point: &V,
    cell: &[usize; 3],
    visited: &mut VisitedTriangles,
) -> Result<f32> {
    visited.clear();

    let cell_count = grid.get_cell_count();
    let min_cell_size = grid.get_min_cell_size();
    let mut best = f32::INFINITY;
    let mut found = false;

    for k in 0.. {
        for neighbour in shell(cell, k, cell_count) {
            for &triangle in lists.triangles_at(grid, &neighbour) {
                let triangle = triangle as usize;
                if !visited.insert(triangle) {
                    continue;
                }
                found = true;

                let distance = triangle_distance(mesh, point, triangle)?;
                if distance == 0.0 {
                    return Ok(0.0);
                }
                if compare_distances(distance, best).is_lt() {
                    best = distance;
                }
            }
        }

        // A triangle missing from every shell up to `k` has its bounding box
        // at least `k + 1` samples away on some axis.
        // The extra sample of margin absorbs rounding and near ties.
        let covers_grid =
            (0..3).all(|axis| cell[axis] <= k && cell[axis] + k + 1 >= cell_count[axis]);
        if covers_grid || (found && best.abs() <= k as f32 * min_cell_size) {
            break;
        }
    }

    Ok(best)
}

/// Signed distance from `point` to the nearest triangle, evaluating every triangle.
pub fn distance_brute_force<V: Point>(mesh: &Mesh<V>, point: &V) -> Result<f32> {
    let mut best = f32::INFINITY;
    for triangle in 0..mesh.triangles().len() {
        let distance = triangle_distance(mesh, point, triangle)?;
        if distance == 0.0 {
            return Ok(0.0);
        }
        if compare_distances(distance, best).is_lt() {
            best = distance;
        }
    }
    Ok(best)
}

fn triangle_distance<V: Point>(mesh: &Mesh<V>, point: &V, triangle: usize) -> Result<f32> {
    let (a, b, c) = mesh.triangle_vertices(triangle);
    geo::signed_distance(point, a, b, c).ok_or(Error::DegenerateTriangle { triangle })
}

/// Samples at a Chebyshev distance of exactly `k` from `center`, clamped to the grid.
fn shell(
    center: &[usize; 3],
    k: usize,
    cell_count: [usize; 3],
) -> impl Iterator<Item = [usize; 3]> {
    let center = *center;
    let range = move |axis: usize| {
        center[axis].saturating_sub(k)..=(center[axis] + k).min(cell_count[axis] - 1)
    };

    itertools::iproduct!(range(2), range(1)).flat_map(move |(z, y)| {
        let xs = if z.abs_diff(center[2]) == k || y.abs_diff(center[1]) == k {
            // face of the cube: the whole row.
            Either::Left(range(0))
        } else {
            // inside the cube: only both ends of the row.
            let first = center[0].checked_sub(k);
            let last = Some(center[0] + k).filter(|&x| x < cell_count[0]);
            Either::Right([first, last].into_iter().flatten())
        };
        xs.map(move |x| [x, y, z])
    })
}
