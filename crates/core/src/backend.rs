//! The tabular backend seen by the decoder and encoder.

use crate::cell::CellValue;
use crate::column::CellRef;
use crate::error::MapResult;

/// A workbook that can be read row by row.
pub trait TableSource {
    /// Sheet names in workbook order.
    fn sheet_names(&mut self) -> MapResult<Vec<String>>;

    /// Every row of `sheet` as cell text, starting at row 1.
    ///
    /// Rows are ragged: trailing empty cells are not reported.
    fn read_rows(&mut self, sheet: &str) -> MapResult<Vec<Vec<String>>>;
}

/// A workbook that cells can be written into.
pub trait TableSink {
    /// Create `sheet` if the workbook does not have it yet.
    fn ensure_sheet(&mut self, sheet: &str) -> MapResult<()>;

    /// Drop every cell and column width of an existing `sheet`.
    fn clear_sheet(&mut self, sheet: &str) -> MapResult<()>;

    /// Write a native value at `cell`.
    fn set_cell(&mut self, sheet: &str, cell: CellRef, value: CellValue) -> MapResult<()>;

    /// Set the width of columns `first..=last` (0-based).
    fn set_column_width(&mut self, sheet: &str, first: usize, last: usize, width: f64)
        -> MapResult<()>;

    /// Make `sheet` the one shown when the workbook is opened.
    fn set_active_sheet(&mut self, sheet: &str) -> MapResult<()>;

    /// Serialize the whole workbook.
    fn serialize(&mut self) -> MapResult<Vec<u8>>;
}
