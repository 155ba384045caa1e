//! Error diffusion dithering.
//!
//! Diffusion runs directly on 8-bit sRGB values widened to `f32`. Grids are
//! tiny (tens of cells per side) and the result is meant to match what a
//! plain palette-mapping image library would produce, so there is no linear
//! light or perceptual color space involved.
//!
//! # Example
//!
//! ```
//! use grid_quant::{dither, DitherMethod, DitherOptions, Palette, Rgb};
//!
//! let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
//! let pixels = vec![Rgb::new(128, 128, 128); 4];
//! let indices = dither(&pixels, 2, 2, &palette, DitherMethod::FloydSteinberg, &DitherOptions::new());
//! assert_eq!(indices.len(), 4);
//! ```

mod kernel;
mod options;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use kernel::{Kernel, ATKINSON, FLOYD_STEINBERG};
pub use options::DitherOptions;

use crate::color::Rgb;
use crate::palette::Palette;

/// How pixels are mapped onto a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherMethod {
    /// Plain nearest-color mapping, no error diffusion.
    None,

    /// Floyd-Steinberg error diffusion (100% propagation).
    #[default]
    FloydSteinberg,

    /// Atkinson error diffusion (75% propagation).
    Atkinson,
}

impl DitherMethod {
    /// All methods, in the order they are listed to users.
    pub const ALL: [DitherMethod; 3] = [
        DitherMethod::FloydSteinberg,
        DitherMethod::Atkinson,
        DitherMethod::None,
    ];

    /// Diffusion kernel, or `None` for plain mapping.
    pub fn kernel(self) -> Option<&'static Kernel> {
        match self {
            DitherMethod::None => None,
            DitherMethod::FloydSteinberg => Some(&FLOYD_STEINBERG),
            DitherMethod::Atkinson => Some(&ATKINSON),
        }
    }

    /// Canonical kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            DitherMethod::None => "none",
            DitherMethod::FloydSteinberg => "floyd-steinberg",
            DitherMethod::Atkinson => "atkinson",
        }
    }
}

impl fmt::Display for DitherMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a dither method name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dither method '{0}' (expected floyd-steinberg, atkinson or none)")]
pub struct UnknownDitherMethod(pub String);

impl FromStr for DitherMethod {
    type Err = UnknownDitherMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "none" | "off" => Ok(DitherMethod::None),
            "floyd-steinberg" | "floydsteinberg" | "fs" => Ok(DitherMethod::FloydSteinberg),
            "atkinson" => Ok(DitherMethod::Atkinson),
            _ => Err(UnknownDitherMethod(s.to_string())),
        }
    }
}

/// Sliding window of error rows.
///
/// Only the rows the kernel can reach (`max_dy + 1`) are stored.
#[derive(Debug)]
pub struct ErrorBuffer {
    /// rows[0] is the current row, rows[1] the next, and so on.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// Create a buffer `row_depth` rows deep.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Accumulated error for a pixel in the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a future pixel. Out-of-bounds targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Drop the current row and append a zeroed one.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Map every pixel to a palette index using `method`.
///
/// `pixels` is row-major with `width * height` entries. Returned indices are
/// always `< palette.len()`.
///
/// # Panics
///
/// Panics if `pixels.len() != width * height`.
pub fn dither(
    pixels: &[Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
    method: DitherMethod,
    options: &DitherOptions,
) -> Vec<u8> {
    assert_eq!(pixels.len(), width * height, "pixel count must equal width * height");

    match method.kernel() {
        None => map_nearest(pixels, palette),
        Some(kernel) => dither_with_kernel(pixels, width, height, palette, kernel, options),
    }
}

/// Nearest-color mapping without diffusion.
pub(crate) fn map_nearest(pixels: &[Rgb], palette: &Palette) -> Vec<u8> {
    pixels
        .iter()
        .map(|&p| palette.find_nearest(p).0 as u8)
        .collect()
}

/// Core error diffusion loop parameterized by kernel.
pub(crate) fn dither_with_kernel(
    pixels: &[Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
    options: &DitherOptions,
) -> Vec<u8> {
    let mut output = vec![0u8; width * height];
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        let reverse = options.serpentine && y % 2 == 1;

        let x_range: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..width).rev())
        } else {
            Box::new(0..width)
        };

        for x in x_range {
            let idx = y * width + x;

            let source = pixels[idx].to_f32();
            let accumulated = error_buf.get_accumulated(x);
            let pixel = [
                (source[0] + accumulated[0]).clamp(0.0, 255.0),
                (source[1] + accumulated[1]).clamp(0.0, 255.0),
                (source[2] + accumulated[2]).clamp(0.0, 255.0),
            ];

            let nearest_idx = palette.find_nearest_f32(pixel);
            output[idx] = nearest_idx as u8;

            let nearest = palette.get(nearest_idx).to_f32();
            let error = [
                pixel[0] - nearest[0],
                pixel[1] - nearest[1],
                pixel[2] - nearest[2],
            ];
            if error == [0.0; 3] {
                continue;
            }

            for &(dx, dy, weight) in kernel.entries {
                let effective_dx = if reverse { -dx } else { dx };
                let nx = x as i32 + effective_dx;
                if nx >= 0 && (nx as usize) < width && y + (dy as usize) < height {
                    let w = weight as f32 / divisor;
                    error_buf.add_error(
                        nx as usize,
                        dy as usize,
                        [error[0] * w, error[1] * w, error[2] * w],
                    );
                }
            }
        }

        error_buf.advance_row();
    }

    output
}
