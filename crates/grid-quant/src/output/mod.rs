//! Output types for the quantization pipeline.
//!
//! [`IndexedGrid`] stores one palette index per cell together with the
//! palette that produced it. RGB views are computed on demand.

mod indexed_grid;

pub use indexed_grid::IndexedGrid;
