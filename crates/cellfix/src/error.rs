//! Error types for building and verifying fixtures

use std::path::PathBuf;

use cellfix_core::CellAddress;
use cellfix_xlsx::XlsxError;
use thiserror::Error;

/// Result type for fixture builds
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Errors that abort a fixture build
#[derive(Debug, Error)]
pub enum BuildError {
    /// The directory the output file should land in does not exist
    #[error("output directory does not exist: {}", .0.display())]
    PathUnavailable(PathBuf),

    /// Serializing or moving the file into place failed
    #[error("failed to write {}: {source}", path.display())]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    /// Two test cases target the same cell, or the same description cell
    #[error("duplicate cell address: {0}")]
    DuplicateAddress(CellAddress),

    /// A case's content cell is in the description column
    #[error("cell {0} is in the description column B")]
    ContentInDescriptionColumn(CellAddress),

    /// Sheet model error
    #[error("sheet error: {0}")]
    Core(#[from] cellfix_core::Error),
}

/// Errors reported when checking a written fixture
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The file could not be opened or parsed
    #[error("failed to read fixture: {0}")]
    Read(#[from] XlsxError),

    /// No sheet with the expected title
    #[error("sheet '{0}' not found")]
    MissingSheet(String),

    /// One or more cells differ from the catalog
    #[error("{} mismatch(es):\n  {}", .0.len(), .0.join("\n  "))]
    Mismatch(Vec<String>),
}
