#![allow(clippy::module_inception, clippy::needless_range_loop)]

//! grid-quant: palette quantization for small pixel grids
//!
//! This crate turns a few thousand already-resized pixels into one palette
//! index per grid cell. It knows nothing about image files or rendering;
//! callers hand it row-major [`Rgb`] pixels.
//!
//! # Quick Start
//!
//! ```
//! use grid_quant::{Palette, Quantizer, Rgb};
//!
//! // Auto mode: derive up to 4 colors with median cut
//! let pixels = vec![Rgb::new(10, 10, 10), Rgb::new(240, 240, 240)];
//! let grid = Quantizer::auto(4).quantize(&pixels, 2, 1);
//! assert_eq!(grid.distinct_colors().len(), 2);
//!
//! // Custom mode: force onto a user palette with Floyd-Steinberg
//! let palette = Palette::from_hex(&["#000", "#fff"]).unwrap();
//! let grid = Quantizer::with_palette(palette).quantize(&pixels, 2, 1);
//! assert_eq!(grid.color_at(0, 1), Rgb::WHITE);
//! ```
//!
//! # Palette Membership
//!
//! Every cell of an [`IndexedGrid`] is an entry of its palette. Fixed
//! palettes are never extended with hidden filler entries, so a custom
//! palette of N colors yields cells drawn only from those N colors.

pub mod color;
pub mod dither;
pub mod output;
pub mod palette;
pub mod quantize;


pub use color::Rgb;
pub use dither::{dither, DitherMethod, DitherOptions, UnknownDitherMethod};
pub use output::IndexedGrid;
pub use palette::{Palette, PaletteError, ParseColorError, MAX_PALETTE_SIZE};
pub use quantize::{median_cut, PaletteSource, Quantizer};
