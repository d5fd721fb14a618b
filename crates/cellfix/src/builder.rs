//! Fixture builder
//!
//! Turns a [`Catalog`] into a one-sheet workbook and persists it as XLSX.
//!
//! # Example
//!
//! ```rust,no_run
//! use cellfix::{Catalog, WorkbookBuilder, BuildOptions};
//!
//! let builder = WorkbookBuilder::new(BuildOptions::default());
//! let report = builder
//!     .build(&Catalog::formatted_text(), "TestFiles/FormattedTextTest.xlsx")
//!     .unwrap();
//! println!("{}", report);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use cellfix_core::{CellAddress, CellValue, Style, Workbook, Worksheet};
use cellfix_xlsx::{XlsxError, XlsxWriter};
use tracing::{debug, info};

use crate::catalog::{Catalog, DESCRIPTION_COLUMN};
use crate::error::{BuildError, BuildResult};

/// Where the binary writes the fixture, relative to the working directory
pub const DEFAULT_OUTPUT_PATH: &str = "TestFiles/FormattedTextTest.xlsx";

/// Title of the single fixture sheet
pub const DEFAULT_SHEET_TITLE: &str = "测试数据";

/// Widest column Excel accepts, in characters
const MAX_COLUMN_WIDTH: f64 = 255.0;

/// Options for building a fixture
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Name of the single sheet
    pub sheet_title: String,
    /// Size each used column to its widest value
    pub auto_fit_columns: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            sheet_title: DEFAULT_SHEET_TITLE.to_string(),
            auto_fit_columns: true,
        }
    }
}

/// One written case, as listed in a [`BuildReport`]
#[derive(Debug, Clone, PartialEq)]
pub struct CaseListing {
    pub address: CellAddress,
    pub content: String,
    pub description: String,
    /// Summary of the font flags, e.g. "bold, italic"
    pub style: String,
}

/// What a successful build wrote
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    /// Path of the persisted file
    pub path: PathBuf,
    /// Title of the sheet holding the cases
    pub sheet_title: String,
    /// Cases in catalog order
    pub cases: Vec<CaseListing>,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fixture written: {}", self.path.display())?;
        writeln!(f, "Sheet: {}", self.sheet_title)?;
        for case in &self.cases {
            writeln!(
                f,
                "  {}: {} ({}) [{}]",
                case.address, case.content, case.description, case.style
            )?;
        }
        Ok(())
    }
}

/// Builds fixture workbooks from catalogs
#[derive(Debug, Clone, Default)]
pub struct WorkbookBuilder {
    options: BuildOptions,
}

impl WorkbookBuilder {
    /// Create a builder with the given options
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Options this builder was created with
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build the fixture and persist it at `output_path`.
    ///
    /// The catalog is validated before anything touches the filesystem. The
    /// file is written to a temporary sibling and renamed into place, so on
    /// error any previous file at `output_path` is left as it was.
    pub fn build<P: AsRef<Path>>(
        &self,
        catalog: &Catalog,
        output_path: P,
    ) -> BuildResult<BuildReport> {
        let path = output_path.as_ref();
        info!(path = %path.display(), cases = catalog.len(), "building fixture");

        catalog.check_unique_addresses()?;

        let dir = output_dir(path);
        if !dir.is_dir() {
            return Err(BuildError::PathUnavailable(dir.to_path_buf()));
        }

        let workbook = self.populate(catalog)?;

        persist(&workbook, path, dir).map_err(|source| BuildError::PersistFailed {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "fixture persisted");

        Ok(BuildReport {
            path: path.to_path_buf(),
            sheet_title: self.options.sheet_title.clone(),
            cases: catalog
                .iter()
                .map(|case| CaseListing {
                    address: case.address,
                    content: case.content.clone(),
                    description: case.description.clone(),
                    style: case.style.describe_flags(),
                })
                .collect(),
        })
    }

    /// Build the fixture workbook in memory without persisting it
    pub fn to_workbook(&self, catalog: &Catalog) -> BuildResult<Workbook> {
        catalog.check_unique_addresses()?;
        self.populate(catalog)
    }

    fn populate(&self, catalog: &Catalog) -> BuildResult<Workbook> {
        let mut workbook = Workbook::with_sheet(&self.options.sheet_title)?;
        let sheet = workbook
            .worksheet_mut(0)
            .ok_or(cellfix_core::Error::NoSuchSheet { index: 0, count: 0 })?;

        for case in catalog {
            let addr = case.address;
            sheet.set_cell_value_at(addr.row, addr.col, CellValue::string(&case.content))?;
            sheet.set_cell_style_at(addr.row, addr.col, &Style::from_font(case.style.clone()))?;
            sheet.set_cell_value_at(
                addr.row,
                DESCRIPTION_COLUMN,
                CellValue::string(&case.description),
            )?;
            debug!(
                cell = %addr,
                content = %case.content,
                style = %case.style.describe_flags(),
                "case written"
            );
        }

        if self.options.auto_fit_columns {
            auto_fit_columns(sheet);
        }

        Ok(workbook)
    }
}

/// Build `catalog` at `output_path` with default options
pub fn build<P: AsRef<Path>>(catalog: &Catalog, output_path: P) -> BuildResult<BuildReport> {
    WorkbookBuilder::default().build(catalog, output_path)
}

/// Directory the output file lands in; a bare file name means the working directory
fn output_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write to a temporary file in `dir`, sync it, then rename it over `path`.
fn persist(workbook: &Workbook, path: &Path, dir: &Path) -> Result<(), XlsxError> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".cellfix-")
        .suffix(".xlsx.tmp")
        .tempfile_in(dir)?;

    XlsxWriter::write(workbook, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;

    debug!(tmp = %tmp.path().display(), "renaming into place");
    tmp.persist(path).map_err(|e| XlsxError::Io(e.error))?;
    Ok(())
}

/// Approximate display width of text in Excel character units.
///
/// East Asian wide characters take two units.
fn display_width(text: &str) -> usize {
    text.lines()
        .map(|line| line.chars().map(|ch| if is_wide(ch) { 2 } else { 1 }).sum::<usize>())
        .max()
        .unwrap_or(0)
}

fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x2FFFD
        | 0x30000..=0x3FFFD)
}

/// Widen every used column to fit its widest text, never below the default.
fn auto_fit_columns(sheet: &mut Worksheet) {
    let mut widths: Vec<(u16, usize)> = Vec::new();
    for (_, col, cell) in sheet.iter_cells() {
        let text = cell.value.to_string();
        let width = display_width(&text);
        match widths.iter_mut().find(|(c, _)| *c == col) {
            Some((_, w)) => *w = (*w).max(width),
            None => widths.push((col, width)),
        }
    }

    for (col, units) in widths {
        // Two units of padding for the cell margins
        let width = (units as f64 + 2.0)
            .max(sheet.column_width(col))
            .min(MAX_COLUMN_WIDTH);
        sheet.set_column_width(col, width);
    }
}
