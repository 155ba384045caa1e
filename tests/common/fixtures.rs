//! Test fixtures: synthetic images encoded in memory.

use image::{ImageFormat, Rgb, RgbImage};
use pixgrid::models::{AppConfig, ResampleFilter};
use std::io::Cursor;

pub const RED: [u8; 3] = [255, 0, 0];
pub const GREEN: [u8; 3] = [0, 255, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Encode an image in the given format
pub fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("Failed to encode fixture");
    bytes
}

/// Image split into four solid quadrants: red, green / blue, white
pub fn quadrants(size: u32) -> RgbImage {
    let half = size / 2;
    RgbImage::from_fn(size, size, |x, y| match (x < half, y < half) {
        (true, true) => Rgb(RED),
        (false, true) => Rgb(GREEN),
        (true, false) => Rgb(BLUE),
        (false, false) => Rgb(WHITE),
    })
}

/// Quadrant image as PNG bytes
pub fn quadrants_png(size: u32) -> Vec<u8> {
    encode(&quadrants(size), ImageFormat::Png)
}

/// Smooth two-axis color gradient
pub fn gradient(width: u32, height: u32) -> RgbImage {
    let (sx, sy) = (width.saturating_sub(1).max(1), height.saturating_sub(1).max(1));
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / sx) as u8, (y * 255 / sy) as u8, 128])
    })
}

/// Gradient image as PNG bytes
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Png)
}

/// Decode PNG response bytes back to RGB
pub fn decode_png(bytes: &[u8]) -> RgbImage {
    image::load_from_memory(bytes)
        .expect("Failed to decode PNG")
        .to_rgb8()
}

/// Default config with nearest-neighbour resampling, so solid regions keep
/// their exact colors, and no PNG re-compression.
pub fn nearest_config() -> AppConfig {
    let mut config = AppConfig {
        optimize_png: false,
        ..AppConfig::default()
    };
    config.render.resample = ResampleFilter::Nearest;
    config
}

/// Hex form of a fixture color
pub fn hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
