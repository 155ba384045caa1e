//! Bridge between decoded images and the `grid-quant` crate.

use std::io::Cursor;

use grid_quant::{DitherMethod, IndexedGrid, Palette, PaletteSource, Quantizer, Rgb};
use image::{imageops, ImageError, ImageReader, Limits, RgbImage};

use crate::error::{ParameterError, PipelineError};
use crate::models::{GridSpec, PixelGrid, RenderOptions, ResampleFilter};

/// Decode JPEG, PNG or TIFF bytes into an RGB raster.
///
/// Images wider or taller than `max_dimension` are rejected before their
/// pixels are allocated.
pub fn decode_image(bytes: &[u8], max_dimension: u32) -> Result<RgbImage, PipelineError> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ImageError::IoError)?;
    let mut limits = Limits::default();
    limits.max_image_width = Some(max_dimension);
    limits.max_image_height = Some(max_dimension);
    reader.limits(limits);

    let image = reader.decode()?.to_rgb8();
    if image.width() == 0 {
        return Err(ParameterError::Zero {
            name: "image width",
        }
        .into());
    }
    if image.height() == 0 {
        return Err(ParameterError::Zero {
            name: "image height",
        }
        .into());
    }
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        bytes = bytes.len(),
        "Decoded source image"
    );
    Ok(image)
}

/// Resample `source` to one pixel per grid cell, row-major.
pub fn resize_to_grid(source: &RgbImage, grid: GridSpec, filter: ResampleFilter) -> Vec<Rgb> {
    let resized = imageops::resize(source, grid.width, grid.height, filter.filter_type());
    resized.pixels().map(|p| Rgb::from_bytes(p.0)).collect()
}

/// Resize and map every cell onto the palette from `palette`.
pub fn quantize(
    source: &RgbImage,
    grid: GridSpec,
    palette: PaletteSource,
    options: &RenderOptions,
) -> PixelGrid {
    PixelGrid::from_indexed(&quantize_indexed(source, grid, palette, options))
}

/// Like [`quantize`], keeping the indices and the palette actually used.
pub fn quantize_indexed(
    source: &RgbImage,
    grid: GridSpec,
    palette: PaletteSource,
    options: &RenderOptions,
) -> IndexedGrid {
    let pixels = resize_to_grid(source, grid, options.resample);
    let quantizer = match palette {
        PaletteSource::Auto { color_count } => Quantizer::auto(color_count),
        PaletteSource::Fixed(palette) => Quantizer::with_palette(palette),
    }
    .dither(options.effective_dither());

    quantizer.quantize(&pixels, grid.width as usize, grid.height as usize)
}

/// The palette offered for editing: distinct colors of the auto-quantized
/// grid in first-seen order, padded with white to `color_count`.
pub fn derive_palette(
    source: &RgbImage,
    grid: GridSpec,
    color_count: u32,
    filter: ResampleFilter,
) -> Palette {
    let pixels = resize_to_grid(source, grid, filter);
    let indexed = Quantizer::auto(color_count as usize)
        .dither(DitherMethod::None)
        .quantize(&pixels, grid.width as usize, grid.height as usize);
    Palette::from_colors_padded(&indexed.distinct_colors(), color_count as usize, Rgb::WHITE)
}
