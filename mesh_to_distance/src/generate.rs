//! Distance field generation: spatial index, nearest surface search and parallel evaluation.

pub mod field;
pub mod search;
pub mod triangle_lists;
