//! Row and column number rendering.
//!
//! Labels go through resvg text layout when one of the configured font
//! families is installed. Otherwise a scaled bitmap digit font is used, so
//! rendering never fails for lack of fonts.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use resvg::usvg::{self, Transform};
use tiny_skia::{Paint, Pixmap, Rect};

use crate::error::RenderError;
use crate::rendering::bitmap_font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Label text size in pixels.
pub const LABEL_FONT_SIZE: f32 = 10.0;

/// Bitmap glyph scale factor.
const BITMAP_SCALE: u32 = 2;
/// Horizontal gap between bitmap glyphs in pixels.
const BITMAP_GAP: u32 = 1;

/// A label's text and the point it is centred on.
pub type Label = (String, f32, f32);

#[derive(Clone)]
pub enum LabelFont {
    /// A family found in the font database
    System {
        db: Arc<fontdb::Database>,
        family: String,
    },
    /// Built-in digit glyphs
    Bitmap,
}

impl LabelFont {
    /// Load system fonts (plus `extra_dir`) and pick the first family present.
    pub fn resolve(families: &[String], extra_dir: Option<&Path>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = extra_dir {
            db.load_fonts_dir(dir);
            tracing::debug!(dir = %dir.display(), "Loaded extra font directory");
        }

        tracing::info!(font_count = db.len(), "Loaded fonts for label rendering");

        Self::from_database(Arc::new(db), families)
    }

    /// Pick the first of `families` that `db` knows, case-insensitively.
    pub fn from_database(db: Arc<fontdb::Database>, families: &[String]) -> Self {
        let found = families.iter().find_map(|wanted| {
            db.faces()
                .flat_map(|face| face.families.iter())
                .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
                .map(|(name, _)| name.clone())
        });

        match found {
            Some(family) => {
                tracing::debug!(family = %family, "Using label font");
                LabelFont::System { db, family }
            }
            None => {
                tracing::warn!(
                    tried = ?families,
                    "No label font family found, using built-in bitmap digits"
                );
                LabelFont::Bitmap
            }
        }
    }

    pub fn bitmap() -> Self {
        LabelFont::Bitmap
    }

    /// The resolved family, or `None` for the bitmap font.
    pub fn family(&self) -> Option<&str> {
        match self {
            LabelFont::System { family, .. } => Some(family),
            LabelFont::Bitmap => None,
        }
    }

    /// Draw every label in black, centred on its point.
    pub fn draw_labels(&self, pixmap: &mut Pixmap, labels: &[Label]) -> Result<(), RenderError> {
        if labels.is_empty() {
            return Ok(());
        }
        match self {
            LabelFont::System { db, family } => draw_svg_labels(pixmap, db, family, labels),
            LabelFont::Bitmap => {
                for (text, cx, cy) in labels {
                    draw_bitmap_label(pixmap, text, *cx, *cy);
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFont::System { db, family } => f
                .debug_struct("System")
                .field("family", family)
                .field("faces", &db.len())
                .finish(),
            LabelFont::Bitmap => f.write_str("Bitmap"),
        }
    }
}

/// Lay out all labels as one SVG document and rasterize it over the pixmap.
fn draw_svg_labels(
    pixmap: &mut Pixmap,
    db: &Arc<fontdb::Database>,
    family: &str,
    labels: &[Label],
) -> Result<(), RenderError> {
    let family = escape_xml(family);
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        pixmap.width(),
        pixmap.height()
    );
    for (text, x, y) in labels {
        svg.push_str(&format!(
            r#"<text x="{x}" y="{y}" text-anchor="middle" dominant-baseline="central" font-size="{LABEL_FONT_SIZE}" font-family="{family}" fill="black">{}</text>"#,
            escape_xml(text)
        ));
    }
    svg.push_str("</svg>");

    let options = usvg::Options {
        fontdb: db.clone(),
        ..Default::default()
    };
    let tree =
        usvg::Tree::from_str(&svg, &options).map_err(|e| RenderError::Text(e.to_string()))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Ok(())
}

fn draw_bitmap_label(pixmap: &mut Pixmap, text: &str, cx: f32, cy: f32) {
    let glyphs: Vec<_> = text.chars().filter_map(bitmap_font::glyph).collect();
    if glyphs.is_empty() {
        return;
    }

    let glyph_w = GLYPH_WIDTH * BITMAP_SCALE;
    let glyph_h = GLYPH_HEIGHT * BITMAP_SCALE;
    let total_w = glyphs.len() as u32 * glyph_w + (glyphs.len() as u32 - 1) * BITMAP_GAP;
    let left = (cx - total_w as f32 / 2.0).round();
    let top = (cy - glyph_h as f32 / 2.0).round();

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = false;

    for (i, rows) in glyphs.iter().enumerate() {
        let gx = left + (i as u32 * (glyph_w + BITMAP_GAP)) as f32;
        for row in 0..GLYPH_HEIGHT {
            for col in 0..GLYPH_WIDTH {
                if !bitmap_font::is_set(rows, col, row) {
                    continue;
                }
                let x = gx + (col * BITMAP_SCALE) as f32;
                let y = top + (row * BITMAP_SCALE) as f32;
                if let Some(rect) =
                    Rect::from_xywh(x, y, BITMAP_SCALE as f32, BITMAP_SCALE as f32)
                {
                    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                }
            }
        }
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
