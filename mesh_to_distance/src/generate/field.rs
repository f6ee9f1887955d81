//! Parallel evaluation of the distance field on a grid.

use core::sync::atomic::Ordering;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::{quantize::DistanceRange, Error, Grid, Mesh, Options, Point, Result};

use super::{
    search::{self, VisitedTriangles},
    triangle_lists::TriangleLists,
};

/// Relative slack on the sample spacing before a sign change is considered impossible.
const SMOOTHING_TOLERANCE: f32 = 1e-4;

/// Signed distances of every grid sample, in grid order, and their range.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    /// One signed distance per sample: `x + y * width + z * width * height`.
    pub values: Vec<f32>,
    /// Smallest and largest distances of `values`.
    pub range: DistanceRange,
}

/// Evaluate the signed distance of every sample of `grid` to `mesh`.
///
/// Samples are searched through `lists` when given, otherwise every triangle is evaluated.
///
/// The depth of the grid is split in one slab of z slices per worker.
/// Each worker owns its slab of the output and computes its own min and max,
/// which are merged once all workers are done.
///
/// If several samples fail, the error of the first one in grid order is returned.
pub fn evaluate<V: Point>(
    mesh: &Mesh<V>,
    lists: Option<&TriangleLists>,
    grid: &Grid<V>,
    options: &Options,
) -> Result<DistanceField> {
    let now = web_time::Instant::now();

    let [width, height, depth] = grid.get_cell_count();
    let slice = grid.get_slice_cell_count();
    let slab_depth = depth.div_ceil(rayon::current_num_threads());
    let spacing = grid.get_cell_size().x();

    let mut values = vec![0.0; grid.get_total_cell_count()];
    let slabs = values
        .par_chunks_mut(slab_depth * slice)
        .enumerate()
        .map(|(slab, chunk)| {
            let mut visited = VisitedTriangles::new(mesh.triangles().len());
            let mut flipped = 0;

            for (dz, slice_values) in chunk.chunks_mut(slice).enumerate() {
                if options
                    .cancel
                    .as_ref()
                    .is_some_and(|cancel| cancel.load(Ordering::Relaxed))
                {
                    return Err(Error::Cancelled);
                }

                let z = slab * slab_depth + dz;
                for (y, row) in slice_values.chunks_mut(width).enumerate() {
                    for (x, value) in row.iter_mut().enumerate() {
                        let cell = [x, y, z];
                        let point = grid.get_cell_position(&cell);
                        *value = match lists {
                            Some(lists) => search::distance_using_index(
                                mesh,
                                grid,
                                lists,
                                &point,
                                &cell,
                                &mut visited,
                            )?,
                            None => search::distance_brute_force(mesh, &point)?,
                        };
                    }

                    if options.smooth_sign_flips {
                        flipped += smooth_sign_flips(row, spacing);
                    }
                }
            }

            Ok((
                chunk.iter().copied().map(OrderedFloat).minmax().into_option(),
                flipped,
            ))
        })
        .collect::<Vec<_>>();

    // Merge the workers results, in slab order.
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut flipped = 0;
    for slab in slabs {
        let (range, count) = slab?;
        if let Some((slab_min, slab_max)) = range {
            min = min.min(slab_min.into_inner());
            max = max.max(slab_max.into_inner());
        }
        flipped += count;
    }

    if options.smooth_sign_flips {
        log::debug!("[evaluate] {flipped} sign flip(s) smoothed");
    }
    log::info!(
        "[evaluate] {width}x{height}x{depth} samples in {:.3}ms",
        now.elapsed().as_secs_f64() * 1000.0
    );

    Ok(DistanceField {
        values,
        range: DistanceRange { min, max },
    })
}

/// Fix isolated sign errors along a row of samples `spacing` apart.
///
/// The distance changes by at most `spacing` between two samples, so a sign change
/// where `|previous| + |current|` exceeds it cannot be a real surface crossing:
/// the sample takes the sign of its predecessor.
///
/// Returns the number of corrected samples.
pub fn smooth_sign_flips(row: &mut [f32], spacing: f32) -> usize {
    let threshold = spacing * (1.0 + SMOOTHING_TOLERANCE);
    let mut flipped = 0;
    for i in 1..row.len() {
        let previous = row[i - 1];
        let current = row[i];
        if (previous < 0.0) != (current < 0.0) && previous.abs() + current.abs() > threshold {
            row[i] = if previous < 0.0 {
                -current.abs()
            } else {
                current.abs()
            };
            flipped += 1;
        }
    }
    flipped
}
