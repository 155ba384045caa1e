use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::models::GridSpec;

/// Distance of header labels from the top and left canvas edges.
pub const LABEL_MARGIN: f32 = 10.0;

/// Block geometry for the rendered grid.
///
/// A grid cell is a `cell_size` square followed by `spacing` pixels of
/// gutter. The first cell starts `header_size` pixels from the top-left
/// corner, leaving room for the row and column numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConstants {
    pub cell_size: u32,
    pub spacing: u32,
    pub header_size: u32,
}

impl LayoutConstants {
    pub const DEFAULT: Self = Self {
        cell_size: 15,
        spacing: 5,
        header_size: 40,
    };

    /// Cell plus gutter.
    pub fn block_size(&self) -> u32 {
        self.cell_size + self.spacing
    }

    /// Output raster size for a grid: `(w·block + header, h·block + header)`.
    pub fn output_size(&self, grid: GridSpec) -> (u32, u32) {
        (
            grid.width * self.block_size() + self.header_size,
            grid.height * self.block_size() + self.header_size,
        )
    }

    /// Top-left pixel of the cell at `(row, col)`.
    pub fn cell_origin(&self, row: u32, col: u32) -> (u32, u32) {
        (
            self.header_size + col * self.block_size(),
            self.header_size + row * self.block_size(),
        )
    }

    /// Centre of the 1-based column number above column `col`.
    pub fn column_label_center(&self, col: u32) -> (f32, f32) {
        let (x0, _) = self.cell_origin(0, col);
        (x0 as f32 + self.cell_size as f32 / 2.0, LABEL_MARGIN)
    }

    /// Centre of the 1-based row number left of row `row`.
    pub fn row_label_center(&self, row: u32) -> (f32, f32) {
        let (_, y0) = self.cell_origin(row, 0);
        (LABEL_MARGIN, y0 as f32 + self.cell_size as f32 / 2.0)
    }

    /// Reject geometry that cannot hold a cell or its outline.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.cell_size == 0 {
            return Err(ParameterError::Zero { name: "cell_size" });
        }
        if self.header_size == 0 {
            return Err(ParameterError::Zero {
                name: "header_size",
            });
        }
        Ok(())
    }
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self::DEFAULT
    }
}
