//! # cellfix
//!
//! Generates an XLSX fixture of formatted-text test cases for checking an
//! Excel-to-Word converter.
//!
//! Each [`TestCase`] puts literal text (Unicode superscripts and subscripts,
//! CJK) into a cell of column A with one whole-cell font, and a plain
//! description into column B of the same row.
//!
//! ## Example
//!
//! ```rust
//! use cellfix::prelude::*;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("FormattedTextTest.xlsx");
//!
//! let catalog = Catalog::formatted_text();
//! let report = cellfix::build(&catalog, &path).unwrap();
//! assert_eq!(report.cases.len(), 6);
//!
//! verify(&catalog, &path, DEFAULT_SHEET_TITLE).unwrap();
//! ```

pub mod builder;
pub mod catalog;
pub mod error;
pub mod prelude;
pub mod verify;

pub use builder::{
    build, BuildOptions, BuildReport, CaseListing, WorkbookBuilder, DEFAULT_OUTPUT_PATH,
    DEFAULT_SHEET_TITLE,
};
pub use catalog::{Catalog, TestCase, DESCRIPTION_COLUMN};
pub use error::{BuildError, BuildResult, VerifyError};
pub use verify::{verify, VerifyReport};

// Re-export the sheet model and codec
pub use cellfix_core::{CellAddress, CellValue, FontStyle, Style, Underline, Workbook, Worksheet};
pub use cellfix_xlsx::{XlsxError, XlsxReader, XlsxWriter};
