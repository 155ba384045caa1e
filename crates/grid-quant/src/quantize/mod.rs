//! Grid quantizer: the primary entry point of the crate.
//!
//! A [`Quantizer`] maps already-resized pixels onto a palette. The palette
//! is either derived from the pixels with median cut ([`Quantizer::auto`])
//! or supplied by the caller ([`Quantizer::with_palette`]).

mod median_cut;

pub use median_cut::median_cut;

use crate::color::Rgb;
use crate::dither::{dither, DitherMethod, DitherOptions};
use crate::output::IndexedGrid;
use crate::palette::{Palette, MAX_PALETTE_SIZE};

/// Where the quantizer gets its palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteSource {
    /// Derive up to `color_count` colors from the image with median cut.
    Auto {
        /// Upper bound on derived colors, clamped to `1..=256`.
        color_count: usize,
    },
    /// Force every pixel onto this palette.
    Fixed(Palette),
}

/// Quantization builder.
///
/// Configuration methods consume and return `self`;
/// [`quantize()`](Self::quantize) takes `&self` so one quantizer can be
/// reused across images.
///
/// Defaults differ by mode: auto palettes map without dithering, fixed
/// palettes use Floyd-Steinberg.
///
/// # Example
///
/// ```
/// use grid_quant::{DitherMethod, Palette, Quantizer, Rgb};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// let quantizer = Quantizer::with_palette(palette).dither(DitherMethod::None);
///
/// let pixels = vec![Rgb::new(200, 200, 200); 4];
/// let grid = quantizer.quantize(&pixels, 2, 2);
/// assert_eq!(grid.color_at(1, 1), Rgb::WHITE);
/// ```
#[derive(Debug, Clone)]
pub struct Quantizer {
    source: PaletteSource,
    method: DitherMethod,
    options: DitherOptions,
}

impl Quantizer {
    /// Quantizer that derives up to `color_count` colors from each image.
    pub fn auto(color_count: usize) -> Self {
        Self {
            source: PaletteSource::Auto {
                color_count: color_count.clamp(1, MAX_PALETTE_SIZE),
            },
            method: DitherMethod::None,
            options: DitherOptions::default(),
        }
    }

    /// Quantizer that maps onto a fixed palette.
    pub fn with_palette(palette: Palette) -> Self {
        Self {
            source: PaletteSource::Fixed(palette),
            method: DitherMethod::FloydSteinberg,
            options: DitherOptions::default(),
        }
    }

    /// Set the dithering method.
    #[inline]
    pub fn dither(mut self, method: DitherMethod) -> Self {
        self.method = method;
        self
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.options = self.options.serpentine(enabled);
        self
    }

    /// The configured palette source.
    pub fn source(&self) -> &PaletteSource {
        &self.source
    }

    /// The configured dithering method.
    pub fn method(&self) -> DitherMethod {
        self.method
    }

    /// Quantize `width * height` row-major pixels.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height`.
    pub fn quantize(&self, pixels: &[Rgb], width: usize, height: usize) -> IndexedGrid {
        let palette = match &self.source {
            PaletteSource::Fixed(palette) => palette.clone(),
            PaletteSource::Auto { color_count } => {
                let colors = median_cut(pixels, *color_count);
                Palette::from_colors_padded(&colors, 1, Rgb::BLACK)
            }
        };

        let indices = dither(pixels, width, height, &palette, self.method, &self.options);
        IndexedGrid::new(indices, width, height, palette)
    }
}
