use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use grid_quant::{Palette, PaletteSource, Rgb};
use image::RgbImage;

use crate::error::{PipelineError, RenderError};
use crate::models::{AppConfig, PaletteMode, PixelGrid, SessionSettings};
use crate::rendering::{GridRenderer, LabelFont, RenderedImage};
use crate::services::quantizer;
use crate::services::session::{apply_overrides, Session};

/// Everything one render produced.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: RenderedImage,
    /// Palette the cells were mapped onto
    pub palette: Palette,
    pub grid: PixelGrid,
}

/// Quantize, render and encode in one call.
#[derive(Debug, Clone)]
pub struct PixelArtPipeline {
    renderer: GridRenderer,
    optimize_png: bool,
}

impl PixelArtPipeline {
    pub fn new(renderer: GridRenderer, optimize_png: bool) -> Self {
        Self {
            renderer,
            optimize_png,
        }
    }

    pub fn from_config(config: &AppConfig, font: Arc<LabelFont>) -> Self {
        Self::new(GridRenderer::new(config.layout, font), config.optimize_png)
    }

    pub fn renderer(&self) -> &GridRenderer {
        &self.renderer
    }

    pub fn render_session(&self, session: &Session) -> Result<RenderOutput, PipelineError> {
        self.render_source(session.source(), session.settings(), session.overrides())
    }

    pub fn render_source(
        &self,
        source: &RgbImage,
        settings: &SessionSettings,
        overrides: &BTreeMap<usize, Rgb>,
    ) -> Result<RenderOutput, PipelineError> {
        let started = Instant::now();

        let palette_source = match settings.options.palette_mode {
            PaletteMode::Custom => {
                let derived = quantizer::derive_palette(
                    source,
                    settings.grid,
                    settings.color_count,
                    settings.options.resample,
                );
                PaletteSource::Fixed(apply_overrides(&derived, overrides, settings.color_count))
            }
            PaletteMode::Auto => PaletteSource::Auto {
                color_count: settings.color_count as usize,
            },
        };

        let indexed =
            quantizer::quantize_indexed(source, settings.grid, palette_source, &settings.options);
        let grid = PixelGrid::from_indexed(&indexed);
        let image = self
            .renderer
            .clone()
            .outline(settings.options.outline)
            .render(&grid)?;

        tracing::debug!(
            grid_width = settings.grid.width,
            grid_height = settings.grid.height,
            colors = settings.color_count,
            mode = %settings.options.palette_mode,
            dither = %settings.options.effective_dither(),
            overrides = overrides.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered pixel grid"
        );

        Ok(RenderOutput {
            image,
            palette: indexed.palette().clone(),
            grid,
        })
    }

    /// Render and encode as PNG.
    pub fn render_png(
        &self,
        source: &RgbImage,
        settings: &SessionSettings,
        overrides: &BTreeMap<usize, Rgb>,
    ) -> Result<Vec<u8>, PipelineError> {
        let output = self.render_source(source, settings, overrides)?;
        Ok(output.image.encode_png(self.optimize_png)?)
    }

    /// Render a session snapshot to PNG without blocking the async runtime.
    pub async fn render_png_blocking(&self, session: Session) -> Result<Vec<u8>, PipelineError> {
        let pipeline = self.clone();
        run_blocking(move || {
            let output = pipeline.render_session(&session)?;
            Ok(output.image.encode_png(pipeline.optimize_png)?)
        })
        .await
    }

    /// Palette a session renders with, computed off the async runtime.
    ///
    /// Custom mode applies the overrides; auto mode ignores them and uses
    /// the derived colors.
    pub async fn current_palette_blocking(session: Session) -> Result<Palette, PipelineError> {
        run_blocking(move || {
            Ok(match session.settings().options.palette_mode {
                PaletteMode::Custom => session.current_palette(),
                PaletteMode::Auto => session.derived_palette(),
            })
        })
        .await
    }
}

/// Run CPU-bound work on the blocking thread pool.
pub async fn run_blocking<T, F>(f: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RenderError::Task(e.to_string()))?
}
