use std::fmt;
use std::str::FromStr;

use grid_quant::DitherMethod;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ParameterError;

/// Filter used to shrink the source image down to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    /// Lanczos3: smooth, area-averaging result
    #[default]
    Lanczos,
    /// Nearest neighbour: keeps hard edges, may alias
    Nearest,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Lanczos => FilterType::Lanczos3,
            ResampleFilter::Nearest => FilterType::Nearest,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResampleFilter::Lanczos => "lanczos",
            ResampleFilter::Nearest => "nearest",
        }
    }
}

impl FromStr for ResampleFilter {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lanczos" | "lanczos3" => Ok(ResampleFilter::Lanczos),
            "nearest" => Ok(ResampleFilter::Nearest),
            _ => Err(ParameterError::UnknownOption {
                name: "resample filter",
                value: s.to_string(),
                expected: "lanczos or nearest",
            }),
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether cells use the editable palette or a freshly derived one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    /// Map onto the user-editable palette with error diffusion
    #[default]
    Custom,
    /// Derive the palette from the image with median cut
    Auto,
}

impl PaletteMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteMode::Custom => "custom",
            PaletteMode::Auto => "auto",
        }
    }
}

impl FromStr for PaletteMode {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "custom" => Ok(PaletteMode::Custom),
            "auto" => Ok(PaletteMode::Auto),
            _ => Err(ParameterError::UnknownOption {
                name: "palette mode",
                value: s.to_string(),
                expected: "custom or auto",
            }),
        }
    }
}

impl fmt::Display for PaletteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable mirror of [`DitherMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMode {
    FloydSteinberg,
    Atkinson,
    None,
}

impl From<DitherMode> for DitherMethod {
    fn from(mode: DitherMode) -> Self {
        match mode {
            DitherMode::FloydSteinberg => DitherMethod::FloydSteinberg,
            DitherMode::Atkinson => DitherMethod::Atkinson,
            DitherMode::None => DitherMethod::None,
        }
    }
}

impl From<DitherMethod> for DitherMode {
    fn from(method: DitherMethod) -> Self {
        match method {
            DitherMethod::FloydSteinberg => DitherMode::FloydSteinberg,
            DitherMethod::Atkinson => DitherMode::Atkinson,
            DitherMethod::None => DitherMode::None,
        }
    }
}

impl FromStr for DitherMode {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<DitherMethod>()
            .map(DitherMode::from)
            .map_err(|_| ParameterError::UnknownOption {
                name: "dither method",
                value: s.to_string(),
                expected: "floyd-steinberg, atkinson or none",
            })
    }
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&DitherMethod::from(*self), f)
    }
}

/// Per-render switches on top of grid size and color count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RenderOptions {
    /// Draw a light grey frame around each cell
    pub outline: bool,
    pub resample: ResampleFilter,
    /// Explicit dithering; when unset the palette mode picks
    pub dither: Option<DitherMode>,
    pub palette_mode: PaletteMode,
}

impl RenderOptions {
    /// Dithering actually applied: Floyd-Steinberg for custom palettes and
    /// plain mapping for auto palettes, unless set explicitly.
    pub fn effective_dither(&self) -> DitherMethod {
        match (self.dither, self.palette_mode) {
            (Some(mode), _) => mode.into(),
            (None, PaletteMode::Custom) => DitherMethod::FloydSteinberg,
            (None, PaletteMode::Auto) => DitherMethod::None,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            outline: true,
            resample: ResampleFilter::default(),
            dither: None,
            palette_mode: PaletteMode::default(),
        }
    }
}
