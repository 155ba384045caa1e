use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ParameterError;
use crate::models::{GridSpec, PaletteMode};

/// Accepted ranges for user-supplied grid size and color count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InputBounds {
    pub grid_min: u32,
    pub grid_max: u32,
    pub colors_min: u32,
    pub colors_max: u32,
}

impl InputBounds {
    /// Palette editor: every color gets a picker, so keep the count small.
    pub const EDITOR: Self = Self {
        grid_min: 8,
        grid_max: 120,
        colors_min: 2,
        colors_max: 64,
    };

    /// Auto palette: any size an 8-bit index can address.
    pub const AUTO: Self = Self {
        grid_min: 16,
        grid_max: 120,
        colors_min: 4,
        colors_max: 256,
    };

    pub fn for_mode(mode: PaletteMode) -> Self {
        match mode {
            PaletteMode::Custom => Self::EDITOR,
            PaletteMode::Auto => Self::AUTO,
        }
    }

    pub fn validate(&self, grid: GridSpec, colors: u32) -> Result<(), ParameterError> {
        check("width", grid.width, self.grid_min, self.grid_max)?;
        check("height", grid.height, self.grid_min, self.grid_max)?;
        check("colors", colors, self.colors_min, self.colors_max)
    }
}

fn check(name: &'static str, value: u32, min: u32, max: u32) -> Result<(), ParameterError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ParameterError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(w: u32, h: u32) -> GridSpec {
        GridSpec::new(w, h).unwrap()
    }

    #[test]
    fn test_editor_bounds() {
        let b = InputBounds::EDITOR;
        assert!(b.validate(grid(8, 8), 2).is_ok());
        assert!(b.validate(grid(120, 120), 64).is_ok());
        assert!(b.validate(grid(7, 8), 2).is_err());
        assert!(b.validate(grid(8, 121), 2).is_err());
        assert!(b.validate(grid(32, 32), 65).is_err());
        assert!(b.validate(grid(32, 32), 1).is_err());
    }

    #[test]
    fn test_auto_bounds() {
        let b = InputBounds::AUTO;
        assert!(b.validate(grid(16, 16), 4).is_ok());
        assert!(b.validate(grid(16, 16), 256).is_ok());
        assert!(b.validate(grid(15, 16), 4).is_err());
        assert!(b.validate(grid(16, 16), 3).is_err());
    }

    #[test]
    fn test_error_names_field() {
        let err = InputBounds::EDITOR.validate(grid(32, 200), 8).unwrap_err();
        assert_eq!(err.to_string(), "height must be between 8 and 120 (got 200)");
    }

    #[test]
    fn test_for_mode() {
        assert_eq!(InputBounds::for_mode(PaletteMode::Custom), InputBounds::EDITOR);
        assert_eq!(InputBounds::for_mode(PaletteMode::Auto), InputBounds::AUTO);
    }
}
