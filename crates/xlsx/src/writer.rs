use crate::error::XlsxError;
use rust_xlsxwriter::{Workbook, Worksheet};
use sheetbind_core::{CellRef, CellValue, MapResult, TableSink};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Excel's width for a column with no explicit width.
const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Cells and column widths written to one worksheet so far.
#[derive(Debug, Default)]
struct Written {
    cells: BTreeSet<(u32, u16)>,
    widths: BTreeSet<u16>,
}

/// An xlsx workbook being written.
pub struct XlsxWriter {
    workbook: Workbook,
    sheets: Vec<String>,
    written: HashMap<String, Written>,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxWriter {
    /// Create a workbook with no sheets
    pub fn new() -> Self {
        XlsxWriter {
            workbook: Workbook::new(),
            sheets: Vec::new(),
            written: HashMap::new(),
        }
    }

    /// Sheet names in creation order
    pub fn sheet_names(&self) -> &[String] {
        &self.sheets
    }

    /// Save the workbook to a file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<(), XlsxError> {
        self.workbook.save(path.as_ref())?;
        Ok(())
    }

    /// Serialize the workbook to xlsx bytes
    ///
    /// # Errors
    ///
    /// Returns error if the workbook cannot be assembled.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, XlsxError> {
        Ok(self.workbook.save_to_buffer()?)
    }

    fn worksheet(&mut self, sheet: &str) -> Result<&mut Worksheet, XlsxError> {
        Ok(self.workbook.worksheet_from_name(sheet)?)
    }
}

fn column_num(cell: CellRef) -> Result<u16, XlsxError> {
    u16::try_from(cell.column).map_err(|_| XlsxError::OutOfRange {
        cell: cell.to_string(),
    })
}

fn row_num(cell: CellRef) -> Result<u32, XlsxError> {
    u32::try_from(cell.row_index()).map_err(|_| XlsxError::OutOfRange {
        cell: cell.to_string(),
    })
}

impl TableSink for XlsxWriter {
    fn ensure_sheet(&mut self, sheet: &str) -> MapResult<()> {
        if self.sheets.iter().any(|s| s == sheet) {
            return Ok(());
        }
        self.workbook
            .add_worksheet()
            .set_name(sheet)
            .map_err(XlsxError::from)?;
        self.sheets.push(sheet.to_string());
        Ok(())
    }

    fn clear_sheet(&mut self, sheet: &str) -> MapResult<()> {
        let written = self.written.remove(sheet).unwrap_or_default();
        let worksheet = self.worksheet(sheet)?;
        for (row, col) in written.cells {
            worksheet.clear_cell(row, col);
        }
        for col in written.widths {
            worksheet
                .set_column_width(col, DEFAULT_COLUMN_WIDTH)
                .map_err(XlsxError::from)?;
        }
        Ok(())
    }

    fn set_cell(&mut self, sheet: &str, cell: CellRef, value: CellValue) -> MapResult<()> {
        let row = row_num(cell)?;
        let col = column_num(cell)?;
        let worksheet = self.worksheet(sheet)?;

        match value {
            CellValue::Null => {} // Leave empty
            CellValue::Bool(b) => {
                worksheet
                    .write_boolean(row, col, b)
                    .map_err(XlsxError::from)?;
            }
            CellValue::Int(i) => {
                // Note: Excel stores all numbers as f64, so integers > 2^53
                // may lose precision
                worksheet
                    .write_number(row, col, i as f64)
                    .map_err(XlsxError::from)?;
            }
            CellValue::Float(f) => {
                worksheet
                    .write_number(row, col, f)
                    .map_err(XlsxError::from)?;
            }
            CellValue::String(s) => {
                worksheet
                    .write_string(row, col, s)
                    .map_err(XlsxError::from)?;
            }
        }
        self.written
            .entry(sheet.to_string())
            .or_default()
            .cells
            .insert((row, col));
        Ok(())
    }

    fn set_column_width(
        &mut self,
        sheet: &str,
        first: usize,
        last: usize,
        width: f64,
    ) -> MapResult<()> {
        for column in first.min(last)..=first.max(last) {
            let col = u16::try_from(column).map_err(|_| XlsxError::OutOfRange {
                cell: sheetbind_core::column_name(column),
            })?;
            self.worksheet(sheet)?
                .set_column_width(col, width)
                .map_err(XlsxError::from)?;
            self.written
                .entry(sheet.to_string())
                .or_default()
                .widths
                .insert(col);
        }
        Ok(())
    }

    fn set_active_sheet(&mut self, sheet: &str) -> MapResult<()> {
        self.worksheet(sheet)?.set_active(true);
        Ok(())
    }

    fn serialize(&mut self) -> MapResult<Vec<u8>> {
        Ok(self.to_bytes()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_sheet_once() {
        let mut writer = XlsxWriter::new();
        writer.ensure_sheet("Sheet1").unwrap();
        writer.ensure_sheet("Sheet1").unwrap();
        assert_eq!(writer.sheet_names(), ["Sheet1".to_string()]);
    }

    #[test]
    fn test_clear_sheet_forgets_written_cells() {
        let mut writer = XlsxWriter::new();
        writer.ensure_sheet("Sheet1").unwrap();
        writer
            .set_cell("Sheet1", CellRef::new(1, 3), CellValue::from("old"))
            .unwrap();
        writer.set_column_width("Sheet1", 4, 4, 30.0).unwrap();

        writer.clear_sheet("Sheet1").unwrap();
        assert!(writer.written.get("Sheet1").is_none());
        assert!(writer.clear_sheet("Missing").is_err());
    }

    #[test]
    fn test_unknown_sheet_is_backend_error() {
        let mut writer = XlsxWriter::new();
        let err = writer
            .set_cell("Missing", CellRef::new(0, 1), CellValue::Int(1))
            .unwrap_err();
        assert!(matches!(err, sheetbind_core::MapError::Backend(_)));
    }

    #[test]
    fn test_serialize_produces_zip() {
        let mut writer = XlsxWriter::new();
        writer.ensure_sheet("Sheet1").unwrap();
        writer
            .set_cell("Sheet1", CellRef::new(0, 1), CellValue::from("ID"))
            .unwrap();
        let bytes = writer.serialize().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
