//! # cellfix-xlsx
//!
//! XLSX (Office Open XML) reader and writer for cellfix.
//!
//! The writer emits a minimal SpreadsheetML package with inline-string text
//! cells and a deduplicated font table. The reader parses the same subset
//! back (plus shared strings) so written fixtures can be verified.

pub mod error;
pub mod reader;
pub mod writer;

mod escape;
mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
