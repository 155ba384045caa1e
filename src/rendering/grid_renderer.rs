use std::sync::Arc;

use grid_quant::Rgb;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

use crate::error::RenderError;
use crate::models::{LayoutConstants, PixelGrid};
use crate::rendering::labels::{Label, LabelFont};

/// Frame drawn around each cell when outlines are on.
pub const OUTLINE_COLOR: Rgb = Rgb::new(220, 220, 220);

/// Opaque 8-bit RGB raster produced by [`GridRenderer::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RenderedImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGB bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// # Panics
    ///
    /// Panics if (`x`, `y`) is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        let i = ((y * self.width + x) * 3) as usize;
        Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }
}

/// Draws a [`PixelGrid`] as spaced squares with numbered headers.
#[derive(Debug, Clone)]
pub struct GridRenderer {
    layout: LayoutConstants,
    font: Arc<LabelFont>,
    outline: bool,
}

impl GridRenderer {
    pub fn new(layout: LayoutConstants, font: Arc<LabelFont>) -> Self {
        Self {
            layout,
            font,
            outline: true,
        }
    }

    /// Enable or disable cell outlines.
    pub fn outline(mut self, enabled: bool) -> Self {
        self.outline = enabled;
        self
    }

    pub fn layout(&self) -> &LayoutConstants {
        &self.layout
    }

    pub fn font(&self) -> &LabelFont {
        &self.font
    }

    pub fn render(&self, grid: &PixelGrid) -> Result<RenderedImage, RenderError> {
        let (width, height) = self.layout.output_size(grid.spec());
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let cell = self.layout.cell_size as f32;

        // Outlines sit in the gutter; drawing them all first keeps every
        // fill intact even when spacing is zero.
        if self.outline {
            let paint = solid(OUTLINE_COLOR);
            for row in 0..grid.height() {
                for col in 0..grid.width() {
                    let (x0, y0) = self.layout.cell_origin(row, col);
                    let (x, y) = (x0 as f32, y0 as f32);
                    let frame = [
                        Rect::from_xywh(x - 1.0, y - 1.0, cell + 2.0, 1.0),
                        Rect::from_xywh(x - 1.0, y + cell, cell + 2.0, 1.0),
                        Rect::from_xywh(x - 1.0, y, 1.0, cell),
                        Rect::from_xywh(x + cell, y, 1.0, cell),
                    ];
                    for rect in frame.into_iter().flatten() {
                        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                    }
                }
            }
        }

        for row in 0..grid.height() {
            for col in 0..grid.width() {
                let (x0, y0) = self.layout.cell_origin(row, col);
                let rect = Rect::from_xywh(x0 as f32, y0 as f32, cell, cell).ok_or(
                    RenderError::UnsupportedDimensions {
                        width: self.layout.cell_size,
                        height: self.layout.cell_size,
                    },
                )?;
                pixmap.fill_rect(rect, &solid(grid.get(row, col)), Transform::identity(), None);
            }
        }

        let mut labels: Vec<Label> = Vec::with_capacity((grid.width() + grid.height()) as usize);
        for col in 0..grid.width() {
            let (x, y) = self.layout.column_label_center(col);
            labels.push(((col + 1).to_string(), x, y));
        }
        for row in 0..grid.height() {
            let (x, y) = self.layout.row_label_center(row);
            labels.push(((row + 1).to_string(), x, y));
        }
        self.font.draw_labels(&mut pixmap, &labels)?;

        tracing::debug!(
            grid_width = grid.width(),
            grid_height = grid.height(),
            width,
            height,
            outline = self.outline,
            "Rendered grid"
        );

        Ok(RenderedImage {
            width,
            height,
            data: pixmap_to_rgb(&pixmap),
        })
    }
}

fn solid(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = false;
    paint
}

/// Drop alpha. The canvas starts opaque white, so every pixel is opaque.
fn pixmap_to_rgb(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect()
}
