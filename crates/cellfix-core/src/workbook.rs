//! Workbook type - the main document structure

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Characters Excel rejects in sheet names
const INVALID_SHEET_NAME_CHARS: [char; 7] = ['\\', '/', '*', '?', ':', '[', ']'];

/// A workbook (spreadsheet document)
#[derive(Debug, Default)]
pub struct Workbook {
    /// Worksheets in the workbook
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create an empty workbook with no worksheets
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a workbook with exactly one worksheet of the given name
    pub fn with_sheet(name: &str) -> Result<Self> {
        let mut wb = Self::empty();
        wb.add_worksheet_with_name(name)?;
        Ok(wb)
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a new worksheet with specified name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name)?;

        let index = self.worksheets.len();
        self.worksheets.push(Worksheet::new(name));
        Ok(index)
    }

    /// Add an existing worksheet to the workbook
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        let index = self.worksheets.len();
        self.worksheets.push(worksheet);
        Ok(index)
    }

    /// Validate a sheet name against Excel's rules and existing sheets
    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetTitle {
                title: String::new(),
                reason: "is empty".into(),
            });
        }
        // Excel counts characters, not bytes
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetTitle {
                title: name.to_string(),
                reason: format!("is longer than {} characters", MAX_SHEET_NAME_LEN),
            });
        }
        if let Some(c) = name.chars().find(|c| INVALID_SHEET_NAME_CHARS.contains(c)) {
            return Err(Error::InvalidSheetTitle {
                title: name.to_string(),
                reason: format!("contains '{}'", c),
            });
        }
        if name.starts_with('\'') || name.ends_with('\'') {
            return Err(Error::InvalidSheetTitle {
                title: name.to_string(),
                reason: "starts or ends with an apostrophe".into(),
            });
        }
        if self
            .worksheets
            .iter()
            .any(|ws| ws.name().eq_ignore_ascii_case(name))
        {
            return Err(Error::DuplicateSheetTitle(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_sheet() {
        let wb = Workbook::with_sheet("测试数据").unwrap();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.worksheet(0).unwrap().name(), "测试数据");
        assert!(wb.worksheet_by_name("测试数据").is_some());
    }

    #[test]
    fn test_invalid_sheet_names() {
        let mut wb = Workbook::empty();
        assert!(wb.add_worksheet_with_name("").is_err());
        assert!(wb.add_worksheet_with_name("a/b").is_err());
        assert!(wb.add_worksheet_with_name("'quoted'").is_err());
        assert!(wb.add_worksheet_with_name(&"x".repeat(32)).is_err());
        // 31 CJK characters are allowed even though they exceed 31 bytes
        assert!(wb.add_worksheet_with_name(&"表".repeat(31)).is_ok());
    }

    #[test]
    fn test_sheet_title_errors_name_the_title() {
        let err = Workbook::with_sheet("a:b").unwrap_err();
        assert_eq!(err.to_string(), "sheet title 'a:b' contains ':'");

        let mut wb = Workbook::with_sheet("Data").unwrap();
        let err = wb.add_worksheet_with_name("DATA").unwrap_err();
        assert_eq!(err.to_string(), "a sheet titled 'DATA' already exists");
    }

    #[test]
    fn test_duplicate_sheet_name() {
        let mut wb = Workbook::with_sheet("Data").unwrap();
        assert!(matches!(
            wb.add_worksheet_with_name("data"),
            Err(Error::DuplicateSheetTitle(_))
        ));
    }
}
