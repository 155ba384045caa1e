pub mod bounds;
pub mod config;
pub mod grid;
pub mod layout;
pub mod options;
pub mod settings;

pub use bounds::InputBounds;
pub use config::{AppConfig, BoundsConfig, DefaultsConfig, FontConfig};
pub use grid::{GridSpec, PixelGrid};
pub use layout::{LayoutConstants, LABEL_MARGIN};
pub use options::{DitherMode, PaletteMode, RenderOptions, ResampleFilter};
pub use settings::SessionSettings;
