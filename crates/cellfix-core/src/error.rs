//! Errors raised while laying out fixture sheets

use thiserror::Error;

use crate::{MAX_COLS, MAX_ROWS};

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Ways the sheet model rejects an address, a sheet title or an edit
#[derive(Debug, Error)]
pub enum Error {
    /// Text that is not an A1-style reference
    #[error("'{text}' is not a cell address: {reason}")]
    InvalidAddress { text: String, reason: &'static str },

    /// Zero-based position past the last row or column of a sheet
    #[error(
        "row index {row}, column index {col} is outside the sheet ({} rows x {} columns)",
        MAX_ROWS,
        MAX_COLS
    )]
    OutOfRange { row: u32, col: u16 },

    /// Sheet index past the end of the workbook
    #[error("no sheet at index {index}; the workbook has {count}")]
    NoSuchSheet { index: usize, count: usize },

    /// Title Excel refuses for a sheet tab
    #[error("sheet title '{title}' {reason}")]
    InvalidSheetTitle { title: String, reason: String },

    /// Title already used by another sheet, compared case-insensitively
    #[error("a sheet titled '{0}' already exists")]
    DuplicateSheetTitle(String),

    /// Style index not present in the sheet's pool
    #[error("style index {index} is not in the sheet's pool of {pool_len}")]
    UnknownStyle { index: u32, pool_len: usize },
}
