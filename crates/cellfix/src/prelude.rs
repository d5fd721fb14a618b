//! Prelude module - common imports for cellfix users
//!
//! ```rust
//! use cellfix::prelude::*;
//! ```

pub use crate::{
    verify,
    BuildError,
    BuildOptions,
    BuildReport,
    Catalog,
    CellAddress,
    CellValue,
    FontStyle,
    TestCase,
    Underline,
    VerifyError,
    WorkbookBuilder,
    DEFAULT_OUTPUT_PATH,
    DEFAULT_SHEET_TITLE,
};
