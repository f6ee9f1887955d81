//! Spatial index mapping each grid sample to the triangles that may be near it.

use rayon::prelude::*;

use crate::{geo, Grid, Mesh, Point};

/// Inclusive range of sample coordinates covered by a triangle, as `(min, max)`.
type CellRange = ([usize; 3], [usize; 3]);

/// For each grid sample, the ascending list of triangles whose bounding box
/// (widened by one sample on each side) contains it.
///
/// Lists are stored back to back: the triangles of the sample `i` are
/// `indices[offsets[i]..offsets[i + 1]]`.
///
/// The index has no false negatives: a triangle is listed in every sample
/// its bounding box touches. It has false positives since bounding boxes are
/// larger than triangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriangleLists {
    offsets: Vec<usize>,
    indices: Vec<u32>,
}

impl TriangleLists {
    /// Build the index of a mesh on a grid.
    ///
    /// Cell ranges are computed in parallel, then triangles are appended
    /// in order so each list is sorted.
    pub fn build<V: Point>(mesh: &Mesh<V>, grid: &Grid<V>) -> Self {
        let now = web_time::Instant::now();

        let ranges = (0..mesh.triangles().len())
            .into_par_iter()
            .map(|triangle| {
                let (a, b, c) = mesh.triangle_vertices(triangle);
                cell_range(grid, &geo::triangle_bounding_box(a, b, c))
            })
            .collect::<Vec<_>>();

        // First pass: count the triangles of each sample.
        let mut offsets = vec![0; grid.get_total_cell_count() + 1];
        for (min, max) in &ranges {
            for cell in cells_in_range(min, max) {
                offsets[grid.get_cell_idx(&cell) + 1] += 1;
            }
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }

        // Second pass: fill the lists.
        let mut cursors = offsets.clone();
        let mut indices = vec![0; offsets[offsets.len() - 1]];
        for (triangle, (min, max)) in ranges.iter().enumerate() {
            for cell in cells_in_range(min, max) {
                let cursor = &mut cursors[grid.get_cell_idx(&cell)];
                indices[*cursor] = triangle as u32;
                *cursor += 1;
            }
        }

        log::info!(
            "[triangle_lists] {} entries for {} triangles in {:.3}ms",
            indices.len(),
            ranges.len(),
            now.elapsed().as_secs_f64() * 1000.0
        );

        Self { offsets, indices }
    }

    /// Get the triangles listed in a sample, by linear index.
    pub fn triangles_in_cell(&self, cell_idx: usize) -> &[u32] {
        &self.indices[self.offsets[cell_idx]..self.offsets[cell_idx + 1]]
    }

    /// Get the triangles listed in a sample, by coordinates.
    pub fn triangles_at<V: Point>(&self, grid: &Grid<V>, cell: &[usize; 3]) -> &[u32] {
        self.triangles_in_cell(grid.get_cell_idx(cell))
    }

    /// Number of samples in the index.
    pub fn cell_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of (sample, triangle) entries over all lists.
    pub fn total_entries(&self) -> usize {
        self.indices.len()
    }
}

/// Snap a bounding box to the grid, with one sample of tolerance on each side.
fn cell_range<V: Point>(grid: &Grid<V>, bounding_box: &(V, V)) -> CellRange {
    let cell_count = grid.get_cell_count();
    let mut min = [0; 3];
    let mut max = [0; 3];
    for axis in 0..3 {
        let last = cell_count[axis] as i64 - 1;
        let low = grid.get_fractional_coordinate(bounding_box.0.get(axis), axis);
        let high = grid.get_fractional_coordinate(bounding_box.1.get(axis), axis);
        min[axis] = (low.floor() as i64 - 1).clamp(0, last) as usize;
        max[axis] = (high.ceil() as i64 + 1).clamp(0, last) as usize;
    }
    (min, max)
}

/// Iterate the samples of an inclusive range, x first.
fn cells_in_range(min: &[usize; 3], max: &[usize; 3]) -> impl Iterator<Item = [usize; 3]> {
    itertools::iproduct!(min[2]..=max[2], min[1]..=max[1], min[0]..=max[0])
        .map(|(z, y, x)| [x, y, z])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::tests::tetrahedron;
    use itertools::Itertools;
    use proptest::prelude::*;

    /// Make sure every list is sorted and only contains valid triangles.
    fn assert_sorted(lists: &TriangleLists, triangle_count: usize) {
        for i in 0..lists.cell_count() {
            let triangles = lists.triangles_in_cell(i);
            assert!(triangles.iter().tuple_windows().all(|(a, b)| a < b));
            assert!(triangles.iter().all(|&t| (t as usize) < triangle_count));
        }
    }

    #[test]
    fn test_single_triangle() {
        let mesh = Mesh::new(
            vec![[1.0, 1.0, 1.0], [2.0, 1.0, 1.0], [1.0, 2.0, 1.0]],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let grid = Grid::from_bounding_box(&[0., 0., 0.], &[5., 5., 5.], [6, 6, 6]).unwrap();
        let lists = TriangleLists::build(&mesh, &grid);

        assert_eq!(lists.cell_count(), 216);
        // x and y cover samples 0..=3, z covers 0..=2.
        assert_eq!(lists.total_entries(), 4 * 4 * 3);
        assert_eq!(lists.triangles_at(&grid, &[0, 0, 0]), &[0]);
        assert_eq!(lists.triangles_at(&grid, &[3, 3, 2]), &[0]);
        assert!(lists.triangles_at(&grid, &[4, 0, 0]).is_empty());
        assert!(lists.triangles_at(&grid, &[0, 0, 3]).is_empty());
    }

    #[test]
    fn test_clamped_to_grid() {
        // The triangle is entirely outside of the grid.
        let mesh = Mesh::new(
            vec![[10.0, -10.0, 0.5], [11.0, -10.0, 0.5], [10.0, -9.0, 0.5]],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let grid = Grid::from_bounding_box(&[0., 0., 0.], &[1., 1., 1.], [3, 3, 3]).unwrap();
        let lists = TriangleLists::build(&mesh, &grid);

        // x snaps to the last sample, y to the first one.
        assert_eq!(lists.triangles_at(&grid, &[2, 0, 0]), &[0]);
        assert_eq!(lists.triangles_at(&grid, &[2, 0, 2]), &[0]);
        assert_eq!(lists.total_entries(), 3);
    }

    #[test]
    fn test_tetrahedron() {
        let mesh = tetrahedron();
        let (min, max) = mesh.bounding_box();
        let grid = Grid::from_bounding_box(&min, &max, [8, 8, 8]).unwrap();
        let lists = TriangleLists::build(&mesh, &grid);

        assert_sorted(&lists, 4);
        // the bottom face spans the whole grid in x and z.
        for (x, z) in itertools::iproduct!(0..8, 0..8) {
            assert!(lists.triangles_at(&grid, &[x, 0, z]).contains(&0));
        }
    }

    #[test]
    fn test_one_sample_tolerance() {
        // The triangle lies strictly between samples 2 and 3 on every axis.
        let mesh = Mesh::new(
            vec![[2.2, 2.2, 2.5], [2.8, 2.2, 2.5], [2.2, 2.8, 2.5]],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let grid = Grid::from_bounding_box(&[0., 0., 0.], &[7., 7., 7.], [8, 8, 8]).unwrap();
        let lists = TriangleLists::build(&mesh, &grid);

        // Samples 1..=4 on each axis: the box snapped to 2..=3, plus one sample on each side.
        assert_eq!(lists.total_entries(), 4 * 4 * 4);
        assert_eq!(lists.triangles_at(&grid, &[1, 1, 1]), &[0]);
        assert_eq!(lists.triangles_at(&grid, &[4, 4, 4]), &[0]);
        assert_eq!(lists.triangles_at(&grid, &[1, 4, 2]), &[0]);
        assert!(lists.triangles_at(&grid, &[0, 2, 2]).is_empty());
        assert!(lists.triangles_at(&grid, &[2, 5, 2]).is_empty());
    }

    fn point() -> impl Strategy<Value = [f32; 3]> {
        prop::array::uniform3(-2.0f32..2.0)
    }

    proptest! {
        #[test]
        fn test_index_completeness(
            triangles in prop::collection::vec((point(), point(), point()), 1..8),
            cell_count in prop::array::uniform3(2usize..10),
        ) {
            let vertices = triangles.iter().flat_map(|&(a, b, c)| [a, b, c]).collect_vec();
            let indices = (0..triangles.len() as u32).map(|i| [3 * i, 3 * i + 1, 3 * i + 2]).collect_vec();
            let mesh = Mesh::new(vertices, indices).unwrap();
            let grid = Grid::from_bounding_box(&[-1.0, -1.5, -1.0], &[1.0, 1.0, 1.5], cell_count).unwrap();
            let lists = TriangleLists::build(&mesh, &grid);

            assert_sorted(&lists, triangles.len());

            // Every sample less than one cell away from the bounding box, on every axis,
            // must list the triangle.
            let tolerance = grid.get_cell_size().mul(0.999);
            for (t, &(a, b, c)) in triangles.iter().enumerate() {
                let (min, max) = geo::triangle_bounding_box(&a, &b, &c);
                let (min, max) = (min.sub(&tolerance), max.add(&tolerance));
                for idx in 0..grid.get_total_cell_count() {
                    let cell = grid.get_cell_integer_coordinates(idx);
                    let position = grid.get_cell_position(&cell);
                    let near = (0..3).all(|axis| {
                        position.get(axis) >= min.get(axis) && position.get(axis) <= max.get(axis)
                    });
                    if near {
                        prop_assert!(lists.triangles_in_cell(idx).contains(&(t as u32)));
                    }
                }
            }
        }
    }
}
