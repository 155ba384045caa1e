use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::models::{GridSpec, InputBounds, RenderOptions};

/// Everything a user can change about a render, apart from palette edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub grid: GridSpec,
    pub color_count: u32,
    pub options: RenderOptions,
}

impl SessionSettings {
    pub fn new(grid: GridSpec, color_count: u32, options: RenderOptions) -> Self {
        Self {
            grid,
            color_count,
            options,
        }
    }

    pub fn validate(&self, bounds: &InputBounds) -> Result<(), ParameterError> {
        bounds.validate(self.grid, self.color_count)
    }
}
