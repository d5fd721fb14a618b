//! Cell storage implementation
//!
//! Sparse storage for worksheet cells. Only non-empty cells are stored,
//! using a row-based BTreeMap so iteration is always row-major.

use std::collections::BTreeMap;

use super::CellValue;
use crate::style::StylePool;

/// Complete data for a single cell
#[derive(Debug, Clone, Default)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
    /// Index into the style pool (0 = default style)
    pub style_index: u32,
}

impl CellData {
    /// Create a new cell with a value and default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style_index: 0,
        }
    }

    /// Create a new cell with a value and style
    pub fn with_style(value: CellValue, style_index: u32) -> Self {
        Self { value, style_index }
    }

    /// Check if this cell is effectively empty (no value and default style)
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style_index == 0
    }
}

/// Sparse row-based storage for worksheet cells
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, CellData>>`
#[derive(Debug, Default)]
pub struct CellStorage {
    /// Row index → column map
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,

    /// Styles referenced by `CellData::style_index`
    style_pool: StylePool,

    /// Custom column widths in characters
    column_widths: BTreeMap<u16, f64>,
}

impl CellStorage {
    /// Default column width in characters
    pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Set a cell value, keeping any style already applied
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        let cell = self.rows.entry(row).or_default().entry(col).or_default();
        cell.value = value;
        if cell.is_empty() {
            self.remove(row, col);
        }
    }

    /// Set a cell's style index, keeping its value
    pub fn set_style(&mut self, row: u32, col: u16, style_index: u32) {
        let cell = self.rows.entry(row).or_default().entry(col).or_default();
        cell.style_index = style_index;
        if cell.is_empty() {
            self.remove(row, col);
        }
    }

    /// Remove a cell, returning its data
    fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        let row_map = self.rows.get_mut(&row)?;
        let removed = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        removed
    }

    /// Iterate over all stored cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, cell)| (row, col, cell)))
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Check if no cells are stored
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the style pool
    pub fn style_pool(&self) -> &StylePool {
        &self.style_pool
    }

    /// Get the style pool mutably
    pub fn style_pool_mut(&mut self) -> &mut StylePool {
        &mut self.style_pool
    }

    /// Width of a column in characters
    pub fn column_width(&self, col: u16) -> f64 {
        self.column_widths
            .get(&col)
            .copied()
            .unwrap_or(Self::DEFAULT_COLUMN_WIDTH)
    }

    /// Set a custom column width in characters
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    /// All custom column widths
    pub fn column_widths(&self) -> &BTreeMap<u16, f64> {
        &self.column_widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut storage = CellStorage::new();
        storage.set_value(0, 0, CellValue::from("a"));
        storage.set_value(2, 1, CellValue::from("b"));

        assert_eq!(storage.len(), 2);
        assert_eq!(storage.get(0, 0).unwrap().value.as_string(), Some("a"));
        assert!(storage.get(1, 0).is_none());
    }

    #[test]
    fn test_style_survives_value_update() {
        let mut storage = CellStorage::new();
        storage.set_style(0, 0, 3);
        storage.set_value(0, 0, CellValue::from("x"));

        let cell = storage.get(0, 0).unwrap();
        assert_eq!(cell.style_index, 3);
        assert_eq!(cell.value.as_string(), Some("x"));
    }

    #[test]
    fn test_empty_cells_are_not_stored() {
        let mut storage = CellStorage::new();
        storage.set_value(0, 0, CellValue::Empty);
        assert!(storage.is_empty());

        storage.set_value(4, 4, CellValue::from(1.0));
        storage.set_value(4, 4, CellValue::Empty);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_iter_is_row_major() {
        let mut storage = CellStorage::new();
        storage.set_value(1, 0, CellValue::from("c"));
        storage.set_value(0, 1, CellValue::from("b"));
        storage.set_value(0, 0, CellValue::from("a"));

        let order: Vec<(u32, u16)> = storage.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_column_widths() {
        let mut storage = CellStorage::new();
        assert_eq!(storage.column_width(0), CellStorage::DEFAULT_COLUMN_WIDTH);
        storage.set_column_width(0, 20.0);
        assert_eq!(storage.column_width(0), 20.0);
        assert_eq!(storage.column_widths().len(), 1);
    }
}
