//! Errors from reading and writing workbook packages

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Failures while packaging a workbook or reading one back
#[derive(Debug, Error)]
pub enum XlsxError {
    /// Opening, writing or syncing a file failed
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a zip archive, or an entry could not be stored
    #[error("zip container: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A part is not well-formed XML
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive is a zip but not a spreadsheet package
    #[error("not an XLSX package: {0}")]
    NotXlsx(String),

    /// The writer refuses to encode something Excel could not open
    #[error("cannot write workbook: {0}")]
    Unwritable(String),

    /// A part the package points at is absent
    #[error("package has no part {0}")]
    MissingPart(String),

    /// A well-formed part holds a value that cannot be interpreted
    #[error("{0}")]
    BadValue(String),

    /// Any failure while reading one named part
    #[error("in {part}: {source}")]
    InPart {
        part: String,
        #[source]
        source: Box<XlsxError>,
    },

    /// The sheet model refused what the package describes
    #[error("sheet model: {0}")]
    Core(#[from] cellfix_core::Error),
}

impl XlsxError {
    /// Attach the name of the part being read
    pub(crate) fn in_part(self, part: &str) -> Self {
        match self {
            already @ XlsxError::InPart { .. } => already,
            other => XlsxError::InPart {
                part: part.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping part context
    pub fn root(&self) -> &XlsxError {
        match self {
            XlsxError::InPart { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_context() {
        let err = XlsxError::BadValue("invalid row number 'x'".into())
            .in_part("xl/worksheets/sheet1.xml");
        assert_eq!(
            err.to_string(),
            "in xl/worksheets/sheet1.xml: invalid row number 'x'"
        );
        assert!(matches!(err.root(), XlsxError::BadValue(_)));

        // The innermost part wins
        let err = err.in_part("xl/workbook.xml");
        assert!(matches!(&err, XlsxError::InPart { part, .. } if part == "xl/worksheets/sheet1.xml"));
    }
}
