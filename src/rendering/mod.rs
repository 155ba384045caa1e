pub mod bitmap_font;
pub mod grid_renderer;
pub mod labels;
pub mod png;

pub use grid_renderer::{GridRenderer, RenderedImage, OUTLINE_COLOR};
pub use labels::{Label, LabelFont, LABEL_FONT_SIZE};
