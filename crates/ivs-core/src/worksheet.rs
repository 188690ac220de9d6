//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellData, CellStorage, CellValue};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::style::{FontStyle, NumberFormat, Style};
use crate::{MAX_COLS, MAX_ROWS};

/// A single-sheet cell grid
///
/// Inherent methods use 0-based indices (`*_at`) or A1 addresses. The
/// [`Document`] implementation exposes the same grid with 1-based rows and
/// columns.
#[derive(Debug, Clone)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Cell Access ===

    /// Get cell value by address string (e.g., "A1")
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get cell value by indices
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Get a cell's style index by row/column.
    ///
    /// Returns 0 if the cell does not exist or has the default style.
    pub fn cell_style_index_at(&self, row: u32, col: u16) -> u32 {
        self.cells.get(row, col).map(|c| c.style_index).unwrap_or(0)
    }

    /// Get a style by its index in this worksheet's style pool.
    pub fn style_by_index(&self, style_index: u32) -> Option<&Style> {
        self.cells.style_pool().get(style_index)
    }

    /// Get the style applied to a cell (the default style if none was set)
    pub fn cell_style_at(&self, row: u32, col: u16) -> &Style {
        let idx = self.cell_style_index_at(row, col);
        self.style_by_index(idx)
            .unwrap_or_else(|| self.cells.style_pool().default_style())
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        self.validate_cell_position(row, col)?;
        self.cells.set_value(row, col, value.into());
        Ok(())
    }

    /// Set a cell formula by row and column indices
    pub fn set_cell_formula_at(&mut self, row: u32, col: u16, formula: &str) -> Result<()> {
        self.set_cell_value_at(row, col, CellValue::formula(formula))
    }

    /// Set a cell style by row and column indices
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: &Style) -> Result<()> {
        self.validate_cell_position(row, col)?;
        let style_index = self.cells.style_pool_mut().get_or_insert(style.clone());
        self.cells.set_style(row, col, style_index);
        Ok(())
    }

    // === Column Operations ===

    /// Get column width
    pub fn column_width_at(&self, col: u16) -> f64 {
        self.cells.column_width(col)
    }

    /// Set column width
    pub fn set_column_width_at(&mut self, col: u16, width: f64) -> Result<()> {
        self.validate_cell_position(0, col)?;
        self.cells.set_column_width(col, width);
        Ok(())
    }

    /// Get all custom column widths (column index → width in characters).
    pub fn custom_column_widths(&self) -> &BTreeMap<u16, f64> {
        self.cells.custom_column_widths()
    }

    // === Iteration ===

    /// Get the number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Check if the worksheet is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounds of all non-empty cells as (min_row, min_col, max_row, max_col)
    pub fn used_bounds(&self) -> Option<(u32, u16, u32, u16)> {
        self.cells.used_bounds()
    }

    /// Iterate over all non-empty cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    // === Internal ===

    fn validate_cell_position(&self, row: u32, col: u16) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        Ok(())
    }

    /// Apply `update` to a copy of the cell's current style and store it
    fn update_style_at<F>(&mut self, row: u32, col: u16, update: F) -> Result<()>
    where
        F: FnOnce(&mut Style),
    {
        let mut style = self.cell_style_at(row, col).clone();
        update(&mut style);
        self.set_cell_style_at(row, col, &style)
    }
}

impl Default for Worksheet {
    fn default() -> Self {
        Self::new("Sheet1")
    }
}

/// Convert 1-based document coordinates into 0-based storage indices
fn zero_based(row: u32, col: u16) -> Result<(u32, u16)> {
    if row == 0 || col == 0 {
        return Err(Error::ZeroIndex { row, col });
    }
    Ok((row - 1, col - 1))
}

impl Document for Worksheet {
    fn value(&self, row: u32, col: u16) -> Result<CellValue> {
        let (r, c) = zero_based(row, col)?;
        Ok(self.get_value_at(r, c))
    }

    fn set_value(&mut self, row: u32, col: u16, value: CellValue) -> Result<()> {
        let (r, c) = zero_based(row, col)?;
        self.set_cell_value_at(r, c, value)
    }

    fn font(&self, row: u32, col: u16) -> Result<FontStyle> {
        let (r, c) = zero_based(row, col)?;
        Ok(self.cell_style_at(r, c).font.clone())
    }

    fn set_font(&mut self, row: u32, col: u16, font: &FontStyle) -> Result<()> {
        let (r, c) = zero_based(row, col)?;
        self.update_style_at(r, c, |style| style.font = font.clone())
    }

    fn number_format(&self, row: u32, col: u16) -> Result<NumberFormat> {
        let (r, c) = zero_based(row, col)?;
        Ok(self.cell_style_at(r, c).number_format.clone())
    }

    fn set_number_format(&mut self, row: u32, col: u16, format: &NumberFormat) -> Result<()> {
        let (r, c) = zero_based(row, col)?;
        self.update_style_at(r, c, |style| style.number_format = format.clone())
    }

    fn column_width(&self, col: u16) -> Result<f64> {
        let (_, c) = zero_based(1, col)?;
        Ok(self.column_width_at(c))
    }

    fn set_column_width(&mut self, col: u16, width: f64) -> Result<()> {
        let (_, c) = zero_based(1, col)?;
        self.set_column_width_at(c, width)
    }

    fn max_row(&self) -> u32 {
        self.cells.last_row().map_or(0, |row| row + 1)
    }
}
