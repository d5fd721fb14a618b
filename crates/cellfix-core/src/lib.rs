//! # cellfix-core
//!
//! Core data structures for the cellfix fixture generator.
//!
//! This crate provides the in-memory sheet model the generator fills before
//! it is serialized:
//! - [`CellValue`] - Values stored in a cell (text, numbers, booleans)
//! - [`CellAddress`] - A1-style cell addressing
//! - [`FontStyle`] and [`Style`] - Whole-cell font formatting
//! - [`Workbook`], [`Worksheet`] - The document structures
//!
//! ## Example
//!
//! ```rust
//! use cellfix_core::{FontStyle, Style, Workbook};
//!
//! let mut workbook = Workbook::with_sheet("Fixtures").unwrap();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", "H₂O").unwrap();
//! sheet
//!     .set_cell_style("A1", &Style::from_font(FontStyle::new().with_bold(true)))
//!     .unwrap();
//!
//! assert_eq!(sheet.get_value("A1").unwrap().as_string(), Some("H₂O"));
//! ```

pub mod cell;
pub mod error;
pub mod style;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellData, CellValue};
pub use error::{Error, Result};
pub use style::{FontStyle, Style, StylePool, Underline};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
