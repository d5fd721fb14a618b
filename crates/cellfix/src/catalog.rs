//! Test case catalog
//!
//! A [`Catalog`] is an ordered list of [`TestCase`]s. Each case puts a piece
//! of text in one cell with one font, and its description in column B of the
//! same row. [`Catalog::formatted_text`] is the fixed set of cases the
//! Excel-to-Word converter is checked against.

use std::collections::HashSet;

use cellfix_core::{CellAddress, FontStyle, Result, Underline};

use crate::error::BuildError;

/// Column holding each case's description (B)
pub const DESCRIPTION_COLUMN: u16 = 1;

/// A single fixture cell: text, font and a human readable description
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// Cell the content is written to
    pub address: CellAddress,
    /// Literal text, written as-is
    pub content: String,
    /// Shown in column B of the same row
    pub description: String,
    /// Font applied to the whole content cell
    pub style: FontStyle,
}

impl TestCase {
    /// Create an unstyled case at an A1-style address
    pub fn new<C, D>(address: &str, content: C, description: D) -> Result<Self>
    where
        C: Into<String>,
        D: Into<String>,
    {
        Ok(Self {
            address: CellAddress::parse(address)?,
            content: content.into(),
            description: description.into(),
            style: FontStyle::default(),
        })
    }

    /// Set the font for the content cell
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Cell the description is written to
    pub fn description_address(&self) -> CellAddress {
        self.address.with_col(DESCRIPTION_COLUMN)
    }
}

/// Ordered collection of test cases; order defines row order in the sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    cases: Vec<TestCase>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The formatted-text fixture: Unicode superscript and subscript digits,
    /// bold, italic, single underline and bold+italic, all in Calibri 11.
    pub fn formatted_text() -> Self {
        let calibri = FontStyle::new();
        let entries = [
            ("2x10⁹", "科学计数法（上标）", calibri.clone()),
            ("H₂O", "水分子式（下标）", calibri.clone()),
            ("测试粗体", "粗体文本", calibri.clone().with_bold(true)),
            ("测试斜体", "斜体文本", calibri.clone().with_italic(true)),
            (
                "测试下划线",
                "下划线文本",
                calibri.clone().with_underline(Underline::Single),
            ),
            (
                "混合格式文本",
                "粗体+斜体",
                calibri.with_bold(true).with_italic(true),
            ),
        ];

        // One case per row of column A, starting at A1
        let cases = entries
            .into_iter()
            .zip(0u32..)
            .map(|((content, description, style), row)| TestCase {
                address: CellAddress::new(row, 0),
                content: content.to_string(),
                description: description.to_string(),
                style,
            })
            .collect();
        Self { cases }
    }

    /// Append a case
    pub fn push(&mut self, case: TestCase) {
        self.cases.push(case);
    }

    /// Append a case, builder style
    pub fn with_case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Iterate cases in order
    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// Number of cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Check if the catalog has no cases
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Get a case by position
    pub fn get(&self, index: usize) -> Option<&TestCase> {
        self.cases.get(index)
    }

    /// Check that every cell is written at most once.
    ///
    /// Content may go in any column except B, which holds the descriptions;
    /// a case there is `ContentInDescriptionColumn`. Both the content cell
    /// and the description cell of each case count, so two cases on one row
    /// share a description cell and are a `DuplicateAddress`. Returns the
    /// first offending address.
    pub fn check_unique_addresses(&self) -> std::result::Result<(), BuildError> {
        let mut occupied = HashSet::with_capacity(self.cases.len() * 2);
        for case in &self.cases {
            if case.address.col == DESCRIPTION_COLUMN {
                return Err(BuildError::ContentInDescriptionColumn(case.address));
            }
            for addr in [case.address, case.description_address()] {
                if !occupied.insert(addr) {
                    return Err(BuildError::DuplicateAddress(addr));
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

impl FromIterator<TestCase> for Catalog {
    fn from_iter<I: IntoIterator<Item = TestCase>>(iter: I) -> Self {
        Self {
            cases: iter.into_iter().collect(),
        }
    }
}
