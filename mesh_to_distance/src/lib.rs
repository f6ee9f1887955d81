//! ⚠️ This crate is still in its early stages. Expect the API to change.
//!
//! ---
//!
//! This crate converts a triangle mesh into a signed distance field (SDF) 3D texture.
//!
//! Every sample of a regular grid enclosing the mesh gets the signed distance
//! to its nearest triangle, then the field is quantized to 8 or 16 bit samples.
//!
//! ```no_run
//! use mesh_to_distance::{generate_texture, Grid, Mesh, Options};
//!
//! let mesh: Mesh = Mesh::load_obj("assets/tetrahedron.obj", true)?;
//! let (min, max) = mesh.bounding_box();
//!
//! // 32 samples on the longest side of the mesh.
//! let grid = Grid::fit_to_bounding_box(&min, &max, 32)?;
//! let texture = generate_texture(&mesh, &grid, &Options::default())?;
//!
//! // `data` is laid out x first: `x + y * width + z * width * height`.
//! let distance = texture.distance(&[3, 2, 1]);
//! # Ok::<(), mesh_to_distance::Error>(())
//! ```
//!
//! ---
//!
//! #### Sign convention
//!
//! The sign of a sample comes from the nearest triangle.
//! Samples in front of a counter-clockwise triangle are negative,
//! samples behind it are positive.
//! For a closed mesh with outward counter-clockwise faces,
//! the outside is negative and the inside positive.
//!
//! When two triangles are equally close, the negative distance wins:
//! a sample in front of one of them is outside of the mesh.
//!
//! #### Search
//!
//! By default a spatial index lists, for each grid sample, the triangles whose
//! bounding box is close to it. Each sample then visits growing shells of
//! samples around itself until no unvisited triangle can be closer.
//! `SearchMethod::BruteForce` evaluates every triangle for every sample instead.
//!
//! Both methods give the same distances.
//!
//! #### Quantization
//!
//! Distances are mapped to `[0, 1]` with `Normalization::Linear`
//! (`(value - min) / (max - min)`) or `Normalization::Logarithmic`
//! (more precision near the surface), then scaled to the sample range.
//! Negative distances are rounded down and positive ones up.
//!
//! The `TextureMetadata` of the texture holds everything needed to decode it:
//! `value = sample / scale * (distance_max - distance_min) + distance_min`.
//!
//! #### Mesh consistency
//!
//! `Mesh::check_consistency` reports triangles that share no edge with the rest
//! of the mesh, and adjacent triangles with opposite windings.
//! The sign of the field is only meaningful for a consistent mesh.
//!
//! #### Features
//!
//! - `glam`: implement `Point` for `glam::Vec3`.
//! - `serde`: serialize textures and their metadata (`save_to_file`,
//!   `read_from_file`, `metadata_to_json`).

use core::sync::atomic::AtomicBool;
use std::sync::Arc;

mod error;
pub mod generate;
pub mod geo;
mod grid;
pub mod mesh;
mod point;
pub mod quantize;
#[cfg(feature = "serde")]
mod serde;

pub use error::{Error, Result};
pub use generate::{field::DistanceField, triangle_lists::TriangleLists};
pub use grid::Grid;
pub use mesh::{ConsistencyWarning, Mesh, Triangle};
pub use point::Point;
pub use quantize::{BitDepth, DistanceRange, Normalization};
#[cfg(feature = "serde")]
pub use self::serde::*;

/// Compare two signed distances by their absolute value.
///
/// Distances whose absolute values are equal up to float errors
/// are ordered with the negative one first.
/// For a closed mesh, a sample in front of one of two equally close triangles is outside,
/// so the outside (negative) distance wins.
///
/// This makes the nearest distance independent of the order triangles are visited in.
pub fn compare_distances(a: f32, b: f32) -> core::cmp::Ordering {
    if float_cmp::approx_eq!(f32, a.abs(), b.abs(), ulps = 2, epsilon = 1e-6) {
        match (a.is_sign_negative(), b.is_sign_negative()) {
            (true, false) => core::cmp::Ordering::Less,
            (false, true) => core::cmp::Ordering::Greater,
            _ => a.abs().total_cmp(&b.abs()),
        }
    } else {
        a.abs().total_cmp(&b.abs())
    }
}

/// How to find the nearest triangle of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMethod {
    /// Search the spatial index in growing shells around the sample.
    #[default]
    TriangleLists,
    /// Evaluate every triangle for every sample.
    /// Much slower, but needs no index.
    BruteForce,
}

/// Settings of [`generate_texture`].
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// How the nearest triangle is found.
    pub search: SearchMethod,
    /// Size of a texture sample.
    pub bits: BitDepth,
    /// How distances are mapped to samples.
    pub normalization: Normalization,
    /// Fix isolated sign errors along x rows after evaluation.
    /// See [`generate::field::smooth_sign_flips`].
    pub smooth_sign_flips: bool,
    /// Set to `true` from another thread to stop the evaluation with [`Error::Cancelled`].
    /// It is checked before each z slice.
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Everything needed to decode a distance texture.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct TextureMetadata {
    /// Smallest distance of the field, mapped to sample `0`.
    pub distance_min: f32,
    /// Largest distance of the field, mapped to the largest sample.
    pub distance_max: f32,
    /// Number of samples on x.
    pub texture_width: usize,
    /// Number of samples on y.
    pub texture_height: usize,
    /// Number of samples on z.
    pub texture_depth: usize,
    /// Position of the first sample.
    pub bounding_box_min: [f32; 3],
    /// Position of the last sample.
    pub bounding_box_max: [f32; 3],
    /// Bounding box of the mesh.
    pub mesh_bounding_box_min: [f32; 3],
    /// Bounding box of the mesh.
    pub mesh_bounding_box_max: [f32; 3],
    /// Size of a sample.
    pub texture_format: BitDepth,
    /// How distances were mapped to samples.
    pub normalization: Normalization,
}

impl TextureMetadata {
    /// Get the distance range of the field.
    pub const fn range(&self) -> DistanceRange {
        DistanceRange {
            min: self.distance_min,
            max: self.distance_max,
        }
    }

    /// Get the number of samples in each direction.
    pub const fn cell_count(&self) -> [usize; 3] {
        [self.texture_width, self.texture_height, self.texture_depth]
    }
}

/// Quantized signed distance field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct DistanceTexture {
    /// How to decode `data`.
    pub metadata: TextureMetadata,
    /// Samples, x first. 16 bit samples are little-endian.
    pub data: Vec<u8>,
}

impl DistanceTexture {
    /// Get the raw sample of a cell.
    pub fn sample(&self, cell: &[usize; 3]) -> u32 {
        let [width, height, _] = self.metadata.cell_count();
        let index = cell[0] + cell[1] * width + cell[2] * width * height;
        quantize::read_sample(&self.data, index, self.metadata.texture_format)
    }

    /// Get the decoded distance of a cell.
    pub fn distance(&self, cell: &[usize; 3]) -> f32 {
        quantize::dequantize(
            self.sample(cell),
            self.metadata.range(),
            self.metadata.texture_format,
            self.metadata.normalization,
        )
    }
}

/// Generate the distance texture of a mesh sampled on a grid.
///
/// Builds the spatial index (unless `options.search` is `BruteForce`),
/// evaluates every sample in parallel and quantizes the field.
///
/// Fails if the mesh has a zero-area triangle, if the field is flat
/// or if the evaluation is cancelled.
pub fn generate_texture<V: Point>(
    mesh: &Mesh<V>,
    grid: &Grid<V>,
    options: &Options,
) -> Result<DistanceTexture> {
    let now = web_time::Instant::now();

    let lists = match options.search {
        SearchMethod::TriangleLists => Some(TriangleLists::build(mesh, grid)),
        SearchMethod::BruteForce => None,
    };
    if let Some(lists) = &lists {
        log::debug!(
            "[generate_texture] {:.2} triangles per sample",
            lists.total_entries() as f64 / lists.cell_count() as f64
        );
    }

    let field = generate::field::evaluate(mesh, lists.as_ref(), grid, options)?;
    let data = quantize::quantize(
        &field.values,
        field.range,
        options.bits,
        options.normalization,
    )?;

    let [width, height, depth] = grid.get_cell_count();
    let (mesh_min, mesh_max) = mesh.bounding_box();
    let to_array = |v: V| [v.x(), v.y(), v.z()];
    let metadata = TextureMetadata {
        distance_min: field.range.min,
        distance_max: field.range.max,
        texture_width: width,
        texture_height: height,
        texture_depth: depth,
        bounding_box_min: to_array(grid.get_min()),
        bounding_box_max: to_array(grid.get_max()),
        mesh_bounding_box_min: to_array(mesh_min),
        mesh_bounding_box_max: to_array(mesh_max),
        texture_format: options.bits,
        normalization: options.normalization,
    };

    log::info!(
        "[generate_texture] {width}x{height}x{depth} {} texture in {:.3}ms",
        options.bits.name(),
        now.elapsed().as_secs_f64() * 1000.0
    );

    Ok(DistanceTexture { metadata, data })
}
