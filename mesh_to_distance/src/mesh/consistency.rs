//! Winding and connectivity diagnostic.
//!
//! Nothing here is fatal: the check only reports what looks wrong with a mesh.

use std::collections::HashMap;

use itertools::Itertools;
use rayon::prelude::*;

use super::{Mesh, Triangle};
use crate::point::Point;

/// Something suspicious found by [`Mesh::check_consistency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConsistencyWarning {
    /// The triangle shares no edge with any other triangle.
    Disconnected {
        /// Index of the triangle.
        triangle: usize,
    },
    /// Two adjacent triangles walk their shared edge in the same direction:
    /// one of them is inverted.
    Inverted {
        /// Index of the first triangle.
        triangle: usize,
        /// Index of the adjacent triangle, always greater than `triangle`.
        neighbour: usize,
    },
}

/// Returns the shared edge if `a` and `b` have exactly two vertices in common.
/// The edge vertices are in the order they appear in `a`.
pub fn is_adjacent(a: &Triangle, b: &Triangle) -> Option<[u32; 2]> {
    let shared = a.iter().filter(|v| b.contains(v)).collect_vec();
    match shared[..] {
        [&s0, &s1] => Some([s0, s1]),
        _ => None,
    }
}

/// Whether `a` walks the edge `from -> to` along its cyclic order.
fn walks(triangle: &Triangle, from: u32, to: u32) -> bool {
    (0..3).any(|i| triangle[i] == from && triangle[(i + 1) % 3] == to)
}

/// Whether the adjacent triangles `a` and `b` have a consistent winding,
/// i.e. they walk their shared edge in opposite directions.
pub fn same_winding_order(a: &Triangle, b: &Triangle, shared: [u32; 2]) -> bool {
    let [s0, s1] = shared;
    walks(a, s0, s1) == walks(b, s1, s0)
}

impl<V: Point> Mesh<V> {
    /// Look for disconnected triangles and inconsistent windings.
    ///
    /// Each finding is logged as a warning and returned, sorted.
    /// An inverted pair is reported once.
    /// Triangles are checked in parallel.
    pub fn check_consistency(&self) -> Vec<ConsistencyWarning> {
        let now = web_time::Instant::now();

        let mut edges: HashMap<[u32; 2], Vec<usize>> = HashMap::new();
        for (i, &[a, b, c]) in self.triangles.iter().enumerate() {
            for [s0, s1] in [[a, b], [b, c], [c, a]] {
                edges.entry([s0.min(s1), s0.max(s1)]).or_default().push(i);
            }
        }

        let mut warnings = self
            .triangles
            .par_iter()
            .enumerate()
            .flat_map_iter(|(i, triangle)| {
                let neighbours = [
                    [triangle[0], triangle[1]],
                    [triangle[1], triangle[2]],
                    [triangle[2], triangle[0]],
                ]
                .into_iter()
                .flat_map(|[s0, s1]| &edges[&[s0.min(s1), s0.max(s1)]])
                .copied()
                .filter(|&j| j != i)
                .unique()
                .filter_map(|j| {
                    let other = &self.triangles[j];
                    is_adjacent(triangle, other).map(|shared| (j, other, shared))
                })
                .collect_vec();

                let disconnected = neighbours
                    .is_empty()
                    .then_some(ConsistencyWarning::Disconnected { triangle: i });

                let inverted = neighbours
                    .into_iter()
                    .filter(move |&(j, other, shared)| {
                        j > i && !same_winding_order(triangle, other, shared)
                    })
                    .map(move |(j, _, _)| ConsistencyWarning::Inverted {
                        triangle: i,
                        neighbour: j,
                    });

                disconnected.into_iter().chain(inverted)
            })
            .collect::<Vec<_>>();
        warnings.sort_unstable();

        for warning in &warnings {
            match warning {
                ConsistencyWarning::Disconnected { triangle } => {
                    log::warn!("Triangle {triangle} is disconnected! Check your 3D model.");
                }
                ConsistencyWarning::Inverted {
                    triangle,
                    neighbour,
                } => {
                    log::warn!(
                        "Triangle {neighbour} is inverted relative to triangle {triangle}! Check your 3D model."
                    );
                }
            }
        }

        log::info!(
            "[check_consistency] {} warning(s) in {:.3}ms",
            warnings.len(),
            now.elapsed().as_secs_f64() * 1000.0
        );

        warnings
    }
}
