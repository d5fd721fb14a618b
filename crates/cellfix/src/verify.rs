//! Reopen a written fixture and compare it with its catalog

use std::collections::HashSet;
use std::path::Path;

use cellfix_core::{CellAddress, CellValue, Worksheet};
use cellfix_xlsx::XlsxReader;
use tracing::{debug, warn};

use crate::catalog::{Catalog, DESCRIPTION_COLUMN};
use crate::error::VerifyError;

/// Summary of a fixture that matched its catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub sheet_title: String,
    pub cases_checked: usize,
}

/// Check the file at `path` against `catalog`.
///
/// Every case's content, font and description are compared, and column B
/// must hold nothing but descriptions. All differences are reported together.
pub fn verify<P: AsRef<Path>>(
    catalog: &Catalog,
    path: P,
    sheet_title: &str,
) -> Result<VerifyReport, VerifyError> {
    let path = path.as_ref();
    let workbook = XlsxReader::read_file(path)?;
    let sheet = workbook
        .worksheet_by_name(sheet_title)
        .ok_or_else(|| VerifyError::MissingSheet(sheet_title.to_string()))?;

    let mismatches = compare(catalog, sheet);
    if !mismatches.is_empty() {
        warn!(
            path = %path.display(),
            count = mismatches.len(),
            "fixture does not match catalog"
        );
        return Err(VerifyError::Mismatch(mismatches));
    }

    debug!(path = %path.display(), cases = catalog.len(), "fixture verified");
    Ok(VerifyReport {
        sheet_title: sheet_title.to_string(),
        cases_checked: catalog.len(),
    })
}

fn compare(catalog: &Catalog, sheet: &Worksheet) -> Vec<String> {
    let mut mismatches = Vec::new();
    let mut description_rows = HashSet::new();

    for case in catalog {
        let addr = case.address;
        let desc_addr = case.description_address();
        description_rows.insert(addr.row);

        let content = sheet.get_value_at(addr.row, addr.col);
        if content != CellValue::string(&case.content) {
            mismatches.push(format!(
                "{}: expected text {:?}, found {}",
                addr,
                case.content,
                describe(&content)
            ));
        }

        let font = &sheet.effective_style_at(addr.row, addr.col).font;
        if *font != case.style {
            mismatches.push(format!(
                "{}: expected font {:?}, found {:?}",
                addr, case.style, font
            ));
        }

        let description = sheet.get_value_at(desc_addr.row, desc_addr.col);
        if description != CellValue::string(&case.description) {
            mismatches.push(format!(
                "{}: expected description {:?}, found {}",
                desc_addr,
                case.description,
                describe(&description)
            ));
        }
        if sheet.cell_style_at(desc_addr.row, desc_addr.col).is_some() {
            mismatches.push(format!("{}: description cell is styled", desc_addr));
        }
    }

    for (row, col, cell) in sheet.iter_cells() {
        if col == DESCRIPTION_COLUMN && !description_rows.contains(&row) {
            mismatches.push(format!(
                "{}: unexpected value {} in description column",
                CellAddress::new(row, col),
                describe(&cell.value)
            ));
        }
    }

    mismatches
}

fn describe(value: &CellValue) -> String {
    match value {
        CellValue::Empty => "an empty cell".to_string(),
        CellValue::String(s) => format!("text {:?}", s),
        other => format!("{} {}", other.type_name(), other),
    }
}
