use crate::{point::Point, Error, Result};

/// Helper struct to represent the sampling grid of a distance texture.
///
/// A grid is an axis aligned box `[min, max]` sampled at the corners of its cells:
/// - sample `[0, 0, 0]` sits exactly on `min`,
/// - sample `[width - 1, height - 1, depth - 1]` sits exactly on `max`.
///
/// Hence the size of a cell on an axis is `(max - min) / (count - 1)`
/// and at least two samples are required on each axis.
///
/// Samples are stored x first: the linear index of `[x, y, z]` is
/// `x + y * width + z * width * height`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid<V: Point> {
    /// Position of the first sample.
    min: V,
    /// Position of the last sample.
    max: V,
    /// Distance between two consecutive samples on each axis.
    cell_size: V,
    /// Number of samples in each direction: width, height and depth.
    cell_count: [usize; 3],
}

impl<V: Point> Grid<V> {
    /// Create a new grid from its bounding box and the number of samples on each axis.
    ///
    /// Fails if an axis has less than two samples
    /// or if the box is empty or not finite on an axis.
    pub fn from_bounding_box(min: &V, max: &V, cell_count: [usize; 3]) -> Result<Self> {
        for axis in 0..3 {
            if cell_count[axis] < 2 {
                return Err(Error::InvalidGrid(format!(
                    "axis {axis} has {} sample(s), at least 2 are required",
                    cell_count[axis]
                )));
            }
            let extent = max.get(axis) - min.get(axis);
            if !extent.is_finite() || extent <= 0.0 {
                return Err(Error::InvalidGrid(format!(
                    "axis {axis} has an extent of {extent}"
                )));
            }
        }

        let steps = V::new(
            (cell_count[0] - 1) as f32,
            (cell_count[1] - 1) as f32,
            (cell_count[2] - 1) as f32,
        );
        let cell_size = max.sub(min).comp_div(&steps);

        Ok(Self {
            min: *min,
            max: *max,
            cell_size,
            cell_count,
        })
    }

    /// Fit a grid on a bounding box given the number of samples of its longest axis.
    ///
    /// The other axes get `ceil(extent * resolution / longest_extent)` samples (at least 2)
    /// so cells are close to cubes.
    /// An axis with no extent (a flat mesh) is padded by one longest-axis cell on each side.
    pub fn fit_to_bounding_box(min: &V, max: &V, resolution: usize) -> Result<Self> {
        if resolution < 2 {
            return Err(Error::InvalidGrid(format!(
                "resolution is {resolution}, at least 2 is required"
            )));
        }

        let size = max.sub(min);
        let longest = size.x().max(size.y()).max(size.z());
        if !longest.is_finite() || longest <= 0.0 {
            return Err(Error::InvalidGrid(format!(
                "bounding box has a longest side of {longest}"
            )));
        }

        let padding = longest / (resolution - 1) as f32;
        let mut grid_min = [0.0; 3];
        let mut grid_max = [0.0; 3];
        let mut cell_count = [0; 3];
        for axis in 0..3 {
            let extent = size.get(axis);
            if extent > 0.0 {
                grid_min[axis] = min.get(axis);
                grid_max[axis] = max.get(axis);
                cell_count[axis] =
                    ((extent * resolution as f32 / longest).ceil() as usize).max(2);
            } else {
                grid_min[axis] = min.get(axis) - padding;
                grid_max[axis] = max.get(axis) + padding;
                cell_count[axis] = 3;
            }
        }

        Self::from_bounding_box(
            &V::new(grid_min[0], grid_min[1], grid_min[2]),
            &V::new(grid_max[0], grid_max[1], grid_max[2]),
            cell_count,
        )
    }

    /// Get the position of the first sample.
    pub fn get_min(&self) -> V {
        self.min
    }

    /// Get the position of the last sample.
    pub fn get_max(&self) -> V {
        self.max
    }

    /// Get bounding box as `(min, max)`.
    pub fn get_bounding_box(&self) -> (V, V) {
        (self.min, self.max)
    }

    /// Get the size of a cell.
    pub fn get_cell_size(&self) -> V {
        self.cell_size
    }

    /// Get the smallest cell size over the three axes.
    pub fn get_min_cell_size(&self) -> f32 {
        self.cell_size
            .x()
            .min(self.cell_size.y())
            .min(self.cell_size.z())
    }

    /// Get the number of samples in each direction.
    pub fn get_cell_count(&self) -> [usize; 3] {
        self.cell_count
    }

    /// Get the number of samples in a z slice, i.e. `width * height`.
    pub fn get_slice_cell_count(&self) -> usize {
        self.cell_count[0] * self.cell_count[1]
    }

    /// Get the total number of samples.
    pub fn get_total_cell_count(&self) -> usize {
        self.cell_count[0] * self.cell_count[1] * self.cell_count[2]
    }

    /// Get the linear index of a sample.
    pub fn get_cell_idx(&self, cell: &[usize; 3]) -> usize {
        cell[0] + cell[1] * self.cell_count[0] + cell[2] * self.cell_count[0] * self.cell_count[1]
    }

    /// Get the sample coordinates of a linear index.
    pub fn get_cell_integer_coordinates(&self, cell_idx: usize) -> [usize; 3] {
        let slice = self.get_slice_cell_count();
        let z = cell_idx / slice;
        let rest = cell_idx % slice;
        [rest % self.cell_count[0], rest / self.cell_count[0], z]
    }

    /// Get the world position of a sample: `min + cell * cell_size`.
    pub fn get_cell_position(&self, cell: &[usize; 3]) -> V {
        V::new(
            self.min.x() + cell[0] as f32 * self.cell_size.x(),
            self.min.y() + cell[1] as f32 * self.cell_size.y(),
            self.min.z() + cell[2] as f32 * self.cell_size.z(),
        )
    }

    /// Get the fractional sample coordinate of a position on an axis.
    /// `0` is the first sample, `count - 1` the last one.
    /// Positions outside of the grid give coordinates outside of this range.
    pub fn get_fractional_coordinate(&self, position: f32, axis: usize) -> f32 {
        (position - self.min.get(axis)) / (self.max.get(axis) - self.min.get(axis))
            * (self.cell_count[axis] - 1) as f32
    }
}
