//! Indexed quantization result.

use std::collections::HashSet;

use crate::color::Rgb;
use crate::palette::Palette;

/// A quantized grid: palette indices in row-major order plus the palette.
///
/// Every cell color is, by construction, an entry of [`palette()`](IndexedGrid::palette).
///
/// # Example
///
/// ```
/// use grid_quant::{IndexedGrid, Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// let grid = IndexedGrid::new(vec![0, 1, 1, 0], 2, 2, palette);
///
/// assert_eq!(grid.color_at(0, 1), Rgb::WHITE);
/// assert_eq!(grid.to_rgb_bytes().len(), 2 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedGrid {
    /// Palette indices, one per cell, row-major order.
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl IndexedGrid {
    /// Wrap quantized indices.
    ///
    /// # Panics
    ///
    /// Panics if `indices.len() != width * height` or any index is outside
    /// the palette.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Palette) -> Self {
        assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        assert!(
            indices.iter().all(|&i| (i as usize) < palette.len()),
            "index out of palette range"
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    /// Palette indices in row-major order.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The palette the indices refer to.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette index of the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the grid.
    #[inline]
    pub fn index_at(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.height && col < self.width, "cell ({row}, {col}) out of bounds");
        self.indices[row * self.width + col]
    }

    /// Color of the cell at `(row, col)`.
    #[inline]
    pub fn color_at(&self, row: usize, col: usize) -> Rgb {
        self.palette.get(self.index_at(row, col) as usize)
    }

    /// Cell colors in row-major order.
    pub fn to_rgb(&self) -> Vec<Rgb> {
        self.indices
            .iter()
            .map(|&i| self.palette.get(i as usize))
            .collect()
    }

    /// Flat `[R, G, B, R, G, B, ...]` buffer of length `width * height * 3`.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            rgb.extend_from_slice(&self.palette.get(idx as usize).to_bytes());
        }
        rgb
    }

    /// Colors actually used by the grid, in first-seen row-major order.
    pub fn distinct_colors(&self) -> Vec<Rgb> {
        let mut seen = HashSet::new();
        let mut colors = Vec::new();
        for &idx in &self.indices {
            let color = self.palette.get(idx as usize);
            if seen.insert(color) {
                colors.push(color);
            }
        }
        colors
    }
}
