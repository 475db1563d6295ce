//! Decoding table rows into records.

use crate::backend::TableSource;
use crate::column::column_name;
use crate::error::{FieldError, MapError, MapResult};
use crate::record::Record;
use crate::schema::Schema;
use std::collections::HashMap;
use std::fmt;

/// A non-fatal problem found while decoding. Decoding always continues.
///
/// Columns are 0-based; rows are 1-based spreadsheet rows.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeWarning<'a> {
    /// A header cell matched no field label; the column is ignored.
    UnknownHeader { column: usize, label: &'a str },
    /// A data cell sits in a column with no recognized header.
    UnmappedColumn {
        row: usize,
        column: usize,
        value: &'a str,
    },
    /// A typed field could not take the cell text and keeps its zero value.
    InvalidValue {
        row: usize,
        column: usize,
        field: &'static str,
        error: &'a FieldError,
    },
}

impl DecodeWarning<'_> {
    /// Emit the warning through `tracing`.
    pub fn log(&self) {
        match self {
            DecodeWarning::UnknownHeader { column, label } => {
                tracing::warn!(column = %column_name(*column), label, "unknown column header");
            }
            DecodeWarning::UnmappedColumn { row, column, value } => {
                tracing::warn!(row, column = %column_name(*column), value, "unknown column index");
            }
            DecodeWarning::InvalidValue {
                row,
                column,
                field,
                error,
            } => {
                tracing::warn!(row, column = %column_name(*column), field, %error, "invalid cell value");
            }
        }
    }
}

impl fmt::Display for DecodeWarning<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::UnknownHeader { column, label } => {
                write!(f, "unknown column header {label:?} in column {}", column_name(*column))
            }
            DecodeWarning::UnmappedColumn { row, column, value } => write!(
                f,
                "unknown column index at {}{row}: {value:?}",
                column_name(*column)
            ),
            DecodeWarning::InvalidValue {
                row,
                column,
                field,
                error,
            } => write!(f, "field `{field}` at {}{row}: {error}", column_name(*column)),
        }
    }
}

type Reporter<'r> = Box<dyn FnMut(&DecodeWarning<'_>) + 'r>;

/// Turns the first sheet of a table into records.
///
/// Row 1 is the header; every later row becomes one record. Header cells
/// with no matching field label, and data cells under such columns, are
/// reported and skipped.
#[derive(Default)]
pub struct Decoder<'r> {
    reporter: Option<Reporter<'r>>,
}

impl<'r> Decoder<'r> {
    /// A decoder that logs warnings with `tracing`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder that hands every warning to `reporter` instead of logging it.
    ///
    /// # Example
    /// ```
    /// use sheetbind_core::{Decoder, Table};
    ///
    /// sheetbind_core::record! {
    ///     #[derive(Default)]
    ///     struct Row { id: String => "ID" }
    /// }
    ///
    /// let mut table = Table::from_rows("Sheet1", vec![vec!["ID", "Extra"], vec!["1", "x"]]);
    /// let mut warnings = Vec::new();
    /// let rows: Vec<Row> = Decoder::with_reporter(|w| warnings.push(w.to_string()))
    ///     .decode(&mut table)
    ///     .unwrap();
    /// assert_eq!(rows.len(), 1);
    /// assert_eq!(warnings.len(), 2);
    /// ```
    pub fn with_reporter<F>(reporter: F) -> Self
    where
        F: FnMut(&DecodeWarning<'_>) + 'r,
    {
        Decoder {
            reporter: Some(Box::new(reporter)),
        }
    }

    /// Decode the first sheet of `source` into records of type `T`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a malformed record shape, `EmptyInput` when the
    /// source has no sheets, and any backend failure unchanged.
    pub fn decode<T, S>(&mut self, source: &mut S) -> MapResult<Vec<T>>
    where
        T: Record,
        S: TableSource + ?Sized,
    {
        let schema = Schema::<T>::extract()?;

        let sheets = source.sheet_names()?;
        let sheet = sheets.first().ok_or(MapError::EmptyInput)?;
        let rows = source.read_rows(sheet)?;

        let records = self.decode_with(&schema, &rows);
        tracing::debug!(
            sheet = %sheet,
            record = schema.shape_name(),
            count = records.len(),
            "decoded sheet"
        );
        Ok(records)
    }

    /// Decode rows that are already in memory; `rows[0]` is the header.
    pub fn decode_rows<T: Record>(&mut self, rows: &[Vec<String>]) -> MapResult<Vec<T>> {
        let schema = Schema::<T>::extract()?;
        Ok(self.decode_with(&schema, rows))
    }

    fn decode_with<T: Record>(&mut self, schema: &Schema<T>, rows: &[Vec<String>]) -> Vec<T> {
        let Some((header, data)) = rows.split_first() else {
            return Vec::new();
        };

        let labels = schema.label_index();
        let mut columns: HashMap<usize, usize> = HashMap::new();
        for (column, label) in header.iter().enumerate() {
            match labels.get(label.as_str()) {
                Some(&slot) => {
                    columns.insert(column, slot);
                }
                None => self.report(&DecodeWarning::UnknownHeader { column, label }),
            }
        }

        let mut records = Vec::with_capacity(data.len());
        for (offset, row) in data.iter().enumerate() {
            // header is row 1
            let row_number = offset + 2;
            let mut record = T::default();
            for (column, value) in row.iter().enumerate() {
                let Some(&slot) = columns.get(&column) else {
                    self.report(&DecodeWarning::UnmappedColumn {
                        row: row_number,
                        column,
                        value,
                    });
                    continue;
                };
                if let Err(error) = schema.set(slot, &mut record, value) {
                    self.report(&DecodeWarning::InvalidValue {
                        row: row_number,
                        column,
                        field: schema.field_name(slot),
                        error: &error,
                    });
                }
            }
            records.push(record);
        }
        records
    }

    fn report(&mut self, warning: &DecodeWarning<'_>) {
        match self.reporter.as_mut() {
            Some(reporter) => reporter(warning),
            None => warning.log(),
        }
    }
}

/// Decode the first sheet of `source`, logging warnings.
///
/// # Example
/// ```
/// use sheetbind_core::{decode, Table};
///
/// sheetbind_core::record! {
///     #[derive(Debug, Default, PartialEq)]
///     struct Person {
///         id: String => "ID",
///         name: String => "姓名",
///     }
/// }
///
/// let mut table = Table::from_rows("Sheet1", vec![vec!["ID", "姓名"], vec!["1", "赵"]]);
/// let people: Vec<Person> = decode(&mut table).unwrap();
/// assert_eq!(people, vec![Person { id: "1".into(), name: "赵".into() }]);
/// ```
pub fn decode<T, S>(source: &mut S) -> MapResult<Vec<T>>
where
    T: Record,
    S: TableSource + ?Sized,
{
    Decoder::new().decode(source)
}
