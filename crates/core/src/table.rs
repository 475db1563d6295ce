use crate::backend::{TableSink, TableSource};
use crate::cell::{trim_trailing_empty, CellValue};
use crate::column::CellRef;
use crate::error::{MapResult, TableError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One sheet of an in-memory [`Table`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    rows: Vec<Vec<CellValue>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    column_widths: BTreeMap<usize, f64>,
}

impl Sheet {
    /// Rows in order, row 1 first
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    fn set(&mut self, cell: CellRef, value: CellValue) {
        let row_idx = cell.row_index();
        if self.rows.len() <= row_idx {
            self.rows.resize_with(row_idx + 1, Vec::new);
        }
        let row = &mut self.rows[row_idx];
        if row.len() <= cell.column {
            row.resize(cell.column + 1, CellValue::Null);
        }
        row[cell.column] = value;
    }
}

/// An in-memory workbook (preserves sheet order).
///
/// Acts as both a [`TableSource`] and a [`TableSink`], and is what
/// [`encode`](crate::encode) returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    sheets: IndexMap<String, Sheet>,
    active_sheet: Option<String>,
}

impl Table {
    /// Create an empty workbook with no sheets
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a workbook holding one empty sheet
    #[must_use]
    pub fn with_sheet(name: &str) -> Self {
        let mut table = Self::new();
        table.add_sheet(name);
        table
    }

    /// Build a single-sheet workbook from row data
    ///
    /// # Example
    /// ```
    /// use sheetbind_core::Table;
    ///
    /// let table = Table::from_rows("Sheet1", vec![vec!["ID", "Name"], vec!["1", "Ada"]]);
    /// assert_eq!(table.rows("Sheet1").unwrap().len(), 2);
    /// ```
    pub fn from_rows<R, C>(sheet: &str, rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<C>>,
        C: Into<CellValue>,
    {
        let mut table = Self::new();
        table.sheets.insert(
            sheet.to_string(),
            Sheet {
                rows: rows
                    .into_iter()
                    .map(|row| row.into_iter().map(Into::into).collect())
                    .collect(),
                column_widths: BTreeMap::new(),
            },
        );
        table
    }

    /// Add an empty sheet; returns false if it already exists
    pub fn add_sheet(&mut self, name: &str) -> bool {
        if self.sheets.contains_key(name) {
            return false;
        }
        self.sheets.insert(name.to_string(), Sheet::default());
        true
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if a sheet exists
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Rows of a sheet
    pub fn rows(&self, sheet: &str) -> Option<&[Vec<CellValue>]> {
        self.sheets.get(sheet).map(Sheet::rows)
    }

    /// Get the value at an `A1` reference; `None` for cells never written
    pub fn get(&self, sheet: &str, cell: &str) -> Result<Option<&CellValue>, TableError> {
        let cell: CellRef = cell.parse()?;
        let sheet = self.sheet_or_err(sheet)?;
        Ok(sheet
            .rows
            .get(cell.row_index())
            .and_then(|row| row.get(cell.column)))
    }

    /// Width set for a column (0-based), if any
    pub fn column_width(&self, sheet: &str, column: usize) -> Option<f64> {
        self.sheets
            .get(sheet)
            .and_then(|s| s.column_widths.get(&column).copied())
    }

    /// All explicit column widths of a sheet, ordered by column
    pub fn column_widths(&self, sheet: &str) -> Vec<(usize, f64)> {
        self.sheets
            .get(sheet)
            .map(|s| s.column_widths.iter().map(|(c, w)| (*c, *w)).collect())
            .unwrap_or_default()
    }

    /// Name of the active sheet
    pub fn active_sheet(&self) -> Option<&str> {
        self.active_sheet.as_deref()
    }

    /// Load a workbook previously produced by [`TableSink::serialize`]
    pub fn from_json(bytes: &[u8]) -> Result<Self, TableError> {
        serde_json::from_slice(bytes).map_err(|e| TableError::Serialize(e.to_string()))
    }

    fn sheet_or_err(&self, name: &str) -> Result<&Sheet, TableError> {
        self.sheets.get(name).ok_or_else(|| TableError::SheetNotFound {
            name: name.to_string(),
        })
    }

    fn sheet_mut_or_err(&mut self, name: &str) -> Result<&mut Sheet, TableError> {
        self.sheets
            .get_mut(name)
            .ok_or_else(|| TableError::SheetNotFound {
                name: name.to_string(),
            })
    }
}

impl TableSource for Table {
    fn sheet_names(&mut self) -> MapResult<Vec<String>> {
        Ok(self.sheets.keys().cloned().collect())
    }

    fn read_rows(&mut self, sheet: &str) -> MapResult<Vec<Vec<String>>> {
        let sheet = self.sheet_or_err(sheet)?;
        Ok(sheet
            .rows
            .iter()
            .map(|row| {
                let mut text: Vec<String> = row.iter().map(CellValue::to_text).collect();
                trim_trailing_empty(&mut text);
                text
            })
            .collect())
    }
}

impl TableSink for Table {
    fn ensure_sheet(&mut self, sheet: &str) -> MapResult<()> {
        self.add_sheet(sheet);
        Ok(())
    }

    fn clear_sheet(&mut self, sheet: &str) -> MapResult<()> {
        let sheet = self.sheet_mut_or_err(sheet)?;
        sheet.rows.clear();
        sheet.column_widths.clear();
        Ok(())
    }

    fn set_cell(&mut self, sheet: &str, cell: CellRef, value: CellValue) -> MapResult<()> {
        if cell.row == 0 {
            return Err(TableError::InvalidCellReference(format!("row 0 in {sheet}")).into());
        }
        self.sheet_mut_or_err(sheet)?.set(cell, value);
        Ok(())
    }

    fn set_column_width(
        &mut self,
        sheet: &str,
        first: usize,
        last: usize,
        width: f64,
    ) -> MapResult<()> {
        let sheet = self.sheet_mut_or_err(sheet)?;
        for column in first.min(last)..=first.max(last) {
            sheet.column_widths.insert(column, width);
        }
        Ok(())
    }

    fn set_active_sheet(&mut self, sheet: &str) -> MapResult<()> {
        self.sheet_or_err(sheet)?;
        self.active_sheet = Some(sheet.to_string());
        Ok(())
    }

    fn serialize(&mut self) -> MapResult<Vec<u8>> {
        Ok(serde_json::to_vec(&*self).map_err(|e| TableError::Serialize(e.to_string()))?)
    }
}
