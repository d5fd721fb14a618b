//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellData, CellStorage, CellValue};
use crate::error::{Error, Result};
use crate::style::Style;
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
#[derive(Debug)]
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

    /// Get cell value (convenience method)
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get cell value by indices
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
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

    /// Get the effective style of a cell (the default style when none is set)
    pub fn effective_style_at(&self, row: u32, col: u16) -> &Style {
        self.style_by_index(self.cell_style_index_at(row, col))
            .unwrap_or_else(|| self.cells.style_pool().default_style())
    }

    /// Get the non-default style applied to a cell, if any.
    pub fn cell_style_at(&self, row: u32, col: u16) -> Option<&Style> {
        match self.cell_style_index_at(row, col) {
            0 => None,
            idx => self.style_by_index(idx),
        }
    }

    /// Get the non-default style applied to a cell by address, if any.
    pub fn cell_style(&self, address: &str) -> Result<Option<&Style>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_style_at(addr.row, addr.col))
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

    /// Set a cell style by address string
    pub fn set_cell_style(&mut self, address: &str, style: &Style) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_style_at(addr.row, addr.col, style)
    }

    /// Set a cell style by row and column indices
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: &Style) -> Result<()> {
        self.validate_cell_position(row, col)?;
        let style_index = self.cells.style_pool_mut().get_or_insert(style.clone());
        self.cells.set_style(row, col, style_index);
        Ok(())
    }

    /// Set a cell style by index into this sheet's style pool
    pub fn set_cell_style_index_at(&mut self, row: u32, col: u16, style_index: u32) -> Result<()> {
        self.validate_cell_position(row, col)?;
        let pool = self.cells.style_pool();
        if pool.get(style_index).is_none() {
            return Err(Error::UnknownStyle {
                index: style_index,
                pool_len: pool.len(),
            });
        }
        self.cells.set_style(row, col, style_index);
        Ok(())
    }

    /// Add a style to this sheet's pool without applying it, returning its index
    pub fn register_style(&mut self, style: Style) -> u32 {
        self.cells.style_pool_mut().get_or_insert(style)
    }

    // === Iteration ===

    /// Iterate over all non-empty cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the worksheet has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // === Columns ===

    /// Width of a column in characters
    pub fn column_width(&self, col: u16) -> f64 {
        self.cells.column_width(col)
    }

    /// Set a custom column width in characters
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.cells.set_column_width(col, width);
    }

    /// All custom column widths
    pub fn custom_column_widths(&self) -> &BTreeMap<u16, f64> {
        self.cells.column_widths()
    }

    fn validate_cell_position(&self, row: u32, col: u16) -> Result<()> {
        if row >= MAX_ROWS || col >= MAX_COLS {
            return Err(Error::OutOfRange { row, col });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FontStyle;

    #[test]
    fn test_new_worksheet() {
        let ws = Worksheet::new("Test");
        assert_eq!(ws.name(), "Test");
        assert!(ws.is_empty());
    }

    #[test]
    fn test_set_cell_values() {
        let mut ws = Worksheet::new("Test");

        ws.set_cell_value("A1", "Hello").unwrap();
        ws.set_cell_value("B1", 42.0).unwrap();
        ws.set_cell_value("C1", true).unwrap();

        assert_eq!(ws.get_value("A1").unwrap().as_string(), Some("Hello"));
        assert_eq!(ws.get_value("B1").unwrap().as_number(), Some(42.0));
        assert_eq!(ws.get_value("C1").unwrap().as_bool(), Some(true));
        assert!(ws.get_value("D1").unwrap().is_empty());
        assert_eq!(ws.cell_count(), 3);
    }

    #[test]
    fn test_cell_styles() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", "bold").unwrap();
        ws.set_cell_style("A1", &Style::new().bold(true)).unwrap();
        ws.set_cell_value("B1", "plain").unwrap();

        assert!(ws.cell_style("A1").unwrap().unwrap().font.bold);
        assert!(ws.cell_style("B1").unwrap().is_none());
        assert_eq!(ws.effective_style_at(0, 1).font, FontStyle::default());
    }

    #[test]
    fn test_style_index_validation() {
        let mut ws = Worksheet::new("Test");
        let idx = ws.register_style(Style::new().italic(true));
        ws.set_cell_style_index_at(0, 0, idx).unwrap();
        assert!(ws.cell_style_at(0, 0).unwrap().font.italic);

        assert!(matches!(
            ws.set_cell_style_index_at(0, 0, 99),
            Err(Error::UnknownStyle {
                index: 99,
                pool_len: 2
            })
        ));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ws = Worksheet::new("Test");
        assert!(matches!(
            ws.set_cell_value_at(MAX_ROWS, 0, "x"),
            Err(Error::OutOfRange { col: 0, .. })
        ));
        assert!(matches!(
            ws.set_cell_value_at(0, MAX_COLS, "x"),
            Err(Error::OutOfRange { row: 0, .. })
        ));
    }
}
