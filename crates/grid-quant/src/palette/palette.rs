//! Ordered palette with nearest-color matching.
//!
//! Entry order is significant: it fixes the index-to-color mapping used by
//! [`IndexedGrid`](crate::IndexedGrid) and by palette editors that address
//! entries by position.

use std::str::FromStr;

use super::error::PaletteError;
use crate::color::Rgb;

/// Largest palette an 8-bit index can address.
pub const MAX_PALETTE_SIZE: usize = 256;

/// An ordered list of 1 to 256 colors.
///
/// Duplicate entries are allowed (a user may set two palette slots to the
/// same color). Matching always prefers the lowest index on ties, so
/// duplicates after the first are never selected.
///
/// # Example
///
/// ```
/// use grid_quant::{Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest(Rgb::new(200, 200, 200)).0, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from an ordered list of colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::TooManyColors`] if more than 256 colors are given
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_PALETTE_SIZE {
            return Err(PaletteError::TooManyColors {
                count: colors.len(),
                max: MAX_PALETTE_SIZE,
            });
        }
        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Create a palette from hex color strings like `"#FF0000"` or `"#F00"`.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] naming the first invalid entry,
    /// or the validation errors of [`Palette::new`].
    ///
    /// # Example
    ///
    /// ```
    /// use grid_quant::Palette;
    ///
    /// let palette = Palette::from_hex(&["#000000", "#FFFFFF", "#F00"]).unwrap();
    /// assert_eq!(palette.len(), 3);
    /// ```
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .enumerate()
            .map(|(index, s)| {
                Rgb::from_str(s.as_ref())
                    .map_err(|source| PaletteError::ParseColor { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&colors)
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`: empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn get(&self, idx: usize) -> Rgb {
        self.colors[idx]
    }

    /// All entries in index order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Whether `color` is one of the entries.
    pub fn contains(&self, color: Rgb) -> bool {
        self.colors.contains(&color)
    }

    /// Entries formatted as lowercase `#rrggbb` strings.
    pub fn to_hex(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }

    /// Pad with `filler` until the palette holds `count` entries.
    ///
    /// Existing entries keep their positions. A palette already holding
    /// `count` or more entries is returned unchanged (never truncated).
    /// `count` is capped at [`MAX_PALETTE_SIZE`].
    ///
    /// # Example
    ///
    /// ```
    /// use grid_quant::{Palette, Rgb};
    ///
    /// let red = Rgb::new(255, 0, 0);
    /// let padded = Palette::new(&[red]).unwrap().padded(3, Rgb::WHITE);
    /// assert_eq!(padded.colors(), &[red, Rgb::WHITE, Rgb::WHITE]);
    /// ```
    pub fn padded(mut self, count: usize, filler: Rgb) -> Self {
        let target = count.min(MAX_PALETTE_SIZE);
        if self.colors.len() < target {
            self.colors.resize(target, filler);
        }
        self
    }

    /// Build a palette from a list that may be short or empty, padding
    /// with `filler` up to `count` entries.
    ///
    /// Lists longer than `count` keep all their entries (up to 256).
    pub fn from_colors_padded(colors: &[Rgb], count: usize, filler: Rgb) -> Self {
        let mut colors: Vec<Rgb> = colors.iter().copied().take(MAX_PALETTE_SIZE).collect();
        if colors.is_empty() {
            colors.push(filler);
        }
        Self { colors }.padded(count.max(1), filler)
    }

    /// Find the nearest entry by squared Euclidean RGB distance.
    ///
    /// Returns `(index, distance_squared)`. Ties resolve to the lowest index.
    #[inline]
    pub fn find_nearest(&self, color: Rgb) -> (usize, u32) {
        let mut best_idx = 0;
        let mut best_dist = u32::MAX;

        for (i, &entry) in self.colors.iter().enumerate() {
            let dist = color.distance_squared(entry);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
                if dist == 0 {
                    break;
                }
            }
        }

        (best_idx, best_dist)
    }

    /// Nearest entry to an unquantized pixel (channels in `0.0..=255.0`).
    ///
    /// Used inside the error diffusion loop where pixels carry fractional
    /// accumulated error.
    #[inline]
    pub(crate) fn find_nearest_f32(&self, pixel: [f32; 3]) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f32::MAX;

        for (i, entry) in self.colors.iter().enumerate() {
            let [r, g, b] = entry.to_f32();
            let dr = pixel[0] - r;
            let dg = pixel[1] - g;
            let db = pixel[2] - b;
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        best_idx
    }
}
