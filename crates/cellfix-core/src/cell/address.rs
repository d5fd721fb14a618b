//! Cell address type

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "B12")
///
/// Column letters run A-XFD and row numbers 1-1048576. Both are stored
/// zero-based. Addresses order row-major, which is the order cells appear
/// in a worksheet part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
}

impl CellAddress {
    /// Create a new cell address from 0-based indices
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use cellfix_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!(addr.row, 0);
    /// assert_eq!(addr.col, 0);
    ///
    /// let addr = CellAddress::parse("b6").unwrap();
    /// assert_eq!(addr.to_string(), "B6");
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress {
                text: s.to_string(),
                reason: "address is empty",
            });
        }

        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (col_str, row_str) = s.split_at(split);

        if col_str.is_empty() {
            return Err(Error::InvalidAddress {
                text: s.to_string(),
                reason: "no column letters",
            });
        }
        if row_str.is_empty() {
            return Err(Error::InvalidAddress {
                text: s.to_string(),
                reason: "no row number",
            });
        }

        let col = Self::letters_to_column(col_str)?;

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress {
            text: s.to_string(),
            reason: "row is not a number",
        })?;

        // Rows are 1-based in A1 notation
        if row == 0 {
            return Err(Error::InvalidAddress {
                text: s.to_string(),
                reason: "rows start at 1",
            });
        }

        let row = row - 1;
        if row >= MAX_ROWS {
            return Err(Error::OutOfRange { row, col });
        }

        Ok(Self { row, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress {
                text: String::new(),
                reason: "no column letters",
            });
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress {
                    text: letters.to_string(),
                    reason: "column must be letters only",
                });
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > MAX_COLS as u32 {
                return Err(Error::InvalidAddress {
                    text: letters.to_string(),
                    reason: "column is beyond XFD",
                });
            }
        }

        Ok((col - 1) as u16)
    }

    /// The same row in another column
    pub fn with_col(self, col: u16) -> Self {
        Self { row: self.row, col }
    }

    /// Column letters of this address ("A" for A1)
    pub fn column_letters(&self) -> String {
        Self::column_to_letters(self.col)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(1), "B");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("b").unwrap(), 1);
        assert_eq!(CellAddress::letters_to_column("AA").unwrap(), 26);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16383);
        assert!(CellAddress::letters_to_column("XFE").is_err());
        assert!(CellAddress::letters_to_column("ZZZZ").is_err());
    }

    #[test]
    fn test_cell_address_parse() {
        let addr = CellAddress::parse("A1").unwrap();
        assert_eq!((addr.row, addr.col), (0, 0));

        let addr = CellAddress::parse("B6").unwrap();
        assert_eq!((addr.row, addr.col), (5, 1));

        let addr: CellAddress = " c10 ".parse().unwrap();
        assert_eq!((addr.row, addr.col), (9, 2));
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("1").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A1B").is_err());
        assert!(CellAddress::parse("A-1").is_err());
        assert!(matches!(
            CellAddress::parse("A1048577"),
            Err(Error::OutOfRange { row: 1_048_576, col: 0 })
        ));
        match CellAddress::parse("A0") {
            Err(Error::InvalidAddress { text, reason }) => {
                assert_eq!(text, "A0");
                assert_eq!(reason, "rows start at 1");
            }
            other => panic!("expected InvalidAddress, got {:?}", other),
        }
        assert!(matches!(
            CellAddress::parse("XFE1"),
            Err(Error::InvalidAddress { reason: "column is beyond XFD", .. })
        ));
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(0, 0).to_string(), "A1");
        assert_eq!(CellAddress::new(5, 1).to_string(), "B6");
        assert_eq!(CellAddress::new(2, 0).with_col(1).to_string(), "B3");
        assert_eq!(CellAddress::new(0, 27).column_letters(), "AB");
    }

    #[test]
    fn test_row_major_ordering() {
        let mut addrs = vec![
            CellAddress::new(1, 0),
            CellAddress::new(0, 1),
            CellAddress::new(0, 0),
        ];
        addrs.sort();
        assert_eq!(
            addrs,
            vec![
                CellAddress::new(0, 0),
                CellAddress::new(0, 1),
                CellAddress::new(1, 0)
            ]
        );
    }
}
