use crate::error::XlsxError;
use calamine::{Data, ExcelDateTime, Reader, Xlsx};
use chrono::Timelike;
use sheetbind_core::{trim_trailing_empty, MapResult, TableSource};
use std::io::Cursor;
use std::path::Path;

/// Render a calamine cell the way it is shown in a spreadsheet.
fn data_to_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::String(s) => s.clone(),
        Data::DateTime(dt) => datetime_to_text(dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERROR: {e:?}"),
    }
}

/// Dates as `2023-03-15`, date-times as `2023-03-15 13:45:30`.
///
/// Durations and serials outside the calendar keep the raw day count.
fn datetime_to_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        return dt.as_f64().to_string();
    }
    match dt.as_datetime() {
        Some(value) if value.hour() == 0 && value.minute() == 0 && value.second() == 0 => {
            value.format("%Y-%m-%d").to_string()
        }
        Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}

/// An xlsx workbook opened for reading.
pub struct XlsxReader {
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl XlsxReader {
    /// Open a workbook from its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not an xlsx workbook.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, XlsxError> {
        let workbook = Xlsx::new(Cursor::new(bytes))?;
        Ok(XlsxReader { workbook })
    }

    /// Read a workbook file fully into memory and open it.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not an xlsx workbook.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, XlsxError> {
        let bytes = std::fs::read(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), size = bytes.len(), "read workbook");
        Self::from_bytes(bytes)
    }
}

impl TableSource for XlsxReader {
    fn sheet_names(&mut self) -> MapResult<Vec<String>> {
        Ok(self
            .workbook
            .sheet_names()
            .iter()
            .map(|s| s.to_string())
            .collect())
    }

    /// Rows are indexed from `A1` even when the used range starts further in.
    fn read_rows(&mut self, sheet: &str) -> MapResult<Vec<Vec<String>>> {
        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(XlsxError::from)?;

        let Some((start_row, start_col)) = range.start() else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
        for row in range.rows() {
            let mut text: Vec<String> = std::iter::repeat(String::new())
                .take(start_col as usize)
                .chain(row.iter().map(data_to_text))
                .collect();
            trim_trailing_empty(&mut text);
            rows.push(text);
        }

        Ok(rows)
    }
}
