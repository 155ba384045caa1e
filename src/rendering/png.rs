use std::io::Cursor;

use crate::error::RenderError;
use crate::rendering::RenderedImage;

impl RenderedImage {
    /// Encode as an 8-bit RGB PNG.
    ///
    /// With `optimize`, the result is re-compressed with oxipng. If that
    /// fails the plain encoding is returned.
    pub fn encode_png(&self, optimize: bool) -> Result<Vec<u8>, RenderError> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            // oxipng picks filters and compression itself
            if optimize {
                encoder.set_compression(png::Compression::Fast);
            }
            let mut writer = encoder
                .write_header()
                .map_err(|e| RenderError::PngEncode(e.to_string()))?;
            writer
                .write_image_data(self.as_raw())
                .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        }
        let png_bytes = buf.into_inner();

        if !optimize {
            return Ok(png_bytes);
        }

        let optimized = oxipng::optimize_from_memory(
            &png_bytes,
            &oxipng::Options {
                strip: oxipng::StripChunks::Safe,
                optimize_alpha: false,
                ..Default::default()
            },
        )
        .unwrap_or(png_bytes);
        Ok(optimized)
    }
}
