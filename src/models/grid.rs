use grid_quant::{IndexedGrid, Rgb};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ParameterError;

/// Number of grid columns and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GridSpec {
    /// Columns
    pub width: u32,
    /// Rows
    pub height: u32,
}

impl GridSpec {
    pub fn new(width: u32, height: u32) -> Result<Self, ParameterError> {
        if width == 0 {
            return Err(ParameterError::Zero { name: "width" });
        }
        if height == 0 {
            return Err(ParameterError::Zero { name: "height" });
        }
        Ok(Self { width, height })
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// One color per grid cell, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    spec: GridSpec,
    cells: Vec<Rgb>,
}

impl PixelGrid {
    pub fn new(spec: GridSpec, cells: Vec<Rgb>) -> Result<Self, ParameterError> {
        if cells.len() != spec.cell_count() {
            return Err(ParameterError::CellCount {
                expected: spec.cell_count(),
                actual: cells.len(),
            });
        }
        Ok(Self { spec, cells })
    }

    /// Build a grid from nested rows, as in `[[red, green], [blue, white]]`.
    pub fn from_rows(rows: &[Vec<Rgb>]) -> Result<Self, ParameterError> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        let spec = GridSpec::new(width, height)?;
        let cells: Vec<Rgb> = rows.iter().flatten().copied().collect();
        Self::new(spec, cells)
    }

    pub fn from_indexed(grid: &IndexedGrid) -> Self {
        Self {
            spec: GridSpec {
                width: grid.width() as u32,
                height: grid.height() as u32,
            },
            cells: grid.to_rgb(),
        }
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn width(&self) -> u32 {
        self.spec.width
    }

    pub fn height(&self) -> u32 {
        self.spec.height
    }

    /// Color of the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the grid.
    pub fn get(&self, row: u32, col: u32) -> Rgb {
        assert!(
            row < self.spec.height && col < self.spec.width,
            "cell ({row}, {col}) outside {}x{} grid",
            self.spec.width,
            self.spec.height
        );
        self.cells[(row * self.spec.width + col) as usize]
    }
}
