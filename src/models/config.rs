use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::{
    GridSpec, InputBounds, LayoutConstants, PaletteMode, RenderOptions, SessionSettings,
};

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Cell, spacing and header sizes of the rendered grid
    pub layout: LayoutConstants,

    /// Accepted grid and color ranges per palette mode
    pub bounds: BoundsConfig,

    /// Settings used when a request or CLI call leaves them out
    pub defaults: DefaultsConfig,

    /// Default render options
    pub render: RenderOptions,

    /// Label font lookup
    pub fonts: FontConfig,

    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,

    /// Re-compress PNG output with oxipng
    pub optimize_png: bool,

    /// Filename offered when downloading the rendered PNG
    pub download_filename: String,

    /// Largest accepted source width or height in pixels
    pub max_image_dimension: u32,

    /// Seconds a session may sit idle before it is dropped (0 keeps forever)
    pub session_idle_secs: u64,

    /// Sessions kept at once; the least recently used goes first (0 is unbounded)
    pub max_sessions: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct BoundsConfig {
    pub editor: InputBounds,
    pub auto: InputBounds,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            editor: InputBounds::EDITOR,
            auto: InputBounds::AUTO,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct DefaultsConfig {
    pub width: u32,
    pub height: u32,
    pub colors: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            colors: 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FontConfig {
    /// Families tried in order for row and column labels
    pub families: Vec<String>,

    /// Extra directory of font files loaded next to the system fonts
    pub dir: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            families: ["Arial", "Liberation Sans", "DejaVu Sans", "Helvetica"]
                .into_iter()
                .map(String::from)
                .collect(),
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults.
    ///
    /// A missing path, unreadable file or invalid YAML is logged and never
    /// fatal.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file configured, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        cell_size = config.layout.cell_size,
                        spacing = config.layout.spacing,
                        header_size = config.layout.header_size,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.layout.validate()?;
        Ok(config)
    }

    /// Bounds preset for the given palette mode.
    pub fn bounds_for(&self, mode: PaletteMode) -> InputBounds {
        match mode {
            PaletteMode::Custom => self.bounds.editor,
            PaletteMode::Auto => self.bounds.auto,
        }
    }

    /// Session settings used when nothing else is specified.
    pub fn default_settings(&self) -> anyhow::Result<SessionSettings> {
        let grid = GridSpec::new(self.defaults.width, self.defaults.height)?;
        Ok(SessionSettings::new(grid, self.defaults.colors, self.render))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConstants::default(),
            bounds: BoundsConfig::default(),
            defaults: DefaultsConfig::default(),
            render: RenderOptions::default(),
            fonts: FontConfig::default(),
            max_upload_bytes: 20 * 1024 * 1024,
            optimize_png: true,
            download_filename: "quantized_pixel_design.png".to_string(),
            max_image_dimension: 4096,
            session_idle_secs: 3600,
            max_sessions: 256,
        }
    }
}
