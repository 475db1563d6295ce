//! Spreadsheet-style column labels and `A1` cell references.

use crate::error::TableError;
use std::fmt;
use std::str::FromStr;

/// Convert a 0-based column index to column letters.
///
/// Bijective base-26: there is no zero digit, so 26 wraps to `AA`
/// rather than `BA`. 0=A, 1=B, ... 25=Z, 26=AA, 27=AB, ... 701=ZZ, 702=AAA.
pub fn column_name(index: usize) -> String {
    let mut result = Vec::new();
    let mut n = index + 1; // Convert to 1-based for calculation

    while n > 0 {
        n -= 1;
        result.push((n % 26) as u8 + b'A');
        n /= 26;
    }

    result.reverse();
    String::from_utf8(result).unwrap_or_default()
}

/// Convert column letters to a 0-based column index (case-insensitive).
/// A=0, B=1, ... Z=25, AA=26, AB=27, ...
pub fn column_index(letters: &str) -> Result<usize, TableError> {
    if letters.is_empty() {
        return Err(TableError::InvalidCellReference(letters.to_string()));
    }

    let mut col: usize = 0;
    for b in letters.bytes() {
        let b = b.to_ascii_uppercase();
        if !b.is_ascii_uppercase() {
            return Err(TableError::InvalidCellReference(letters.to_string()));
        }
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add((b - b'A') as usize + 1))
            .ok_or_else(|| TableError::InvalidCellReference(letters.to_string()))?;
    }

    Ok(col - 1) // Convert to 0-based
}

/// A single cell address: 0-based column, 1-based row, as in `B3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub column: usize,
    pub row: usize,
}

impl CellRef {
    /// Build a reference from a 0-based column and a 1-based row.
    #[must_use]
    pub fn new(column: usize, row: usize) -> Self {
        CellRef { column, row }
    }

    /// 0-based row index.
    #[must_use]
    pub fn row_index(&self) -> usize {
        self.row.saturating_sub(1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row)
    }
}

impl FromStr for CellRef {
    type Err = TableError;

    fn from_str(notation: &str) -> Result<Self, Self::Err> {
        let invalid = || TableError::InvalidCellReference(notation.to_string());

        // Find where letters end and numbers begin
        let split_pos = notation
            .bytes()
            .position(|b| b.is_ascii_digit())
            .ok_or_else(invalid)?;
        if split_pos == 0 {
            return Err(invalid());
        }

        let (col_part, row_part) = notation.split_at(split_pos);
        let column = column_index(col_part).map_err(|_| invalid())?;
        let row = row_part.parse::<usize>().map_err(|_| invalid())?;

        // Rows are 1-based
        if row == 0 {
            return Err(invalid());
        }

        Ok(CellRef { column, row })
    }
}
