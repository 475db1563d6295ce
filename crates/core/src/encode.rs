//! Encoding records into a table with a header row.

use crate::backend::TableSink;
use crate::cell::CellValue;
use crate::column::CellRef;
use crate::error::MapResult;
use crate::record::Record;
use crate::schema::{FieldDescriptor, Schema};
use crate::table::Table;

/// Sheet name used when none is configured.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Writes records into a single sheet.
///
/// Row 1 holds the field labels in declaration order; each record fills
/// one following row. Tagged widths become column-width directives.
#[derive(Debug, Clone)]
pub struct Encoder {
    sheet_name: String,
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl Encoder {
    /// An encoder writing to `Sheet1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write to a sheet with a different name.
    #[must_use]
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Name of the sheet records are written to.
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Encode `records` into a fresh in-memory [`Table`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a malformed record shape.
    pub fn encode<T: Record>(&self, records: &[T]) -> MapResult<Table> {
        let mut table = Table::new();
        self.encode_into(&mut table, records)?;
        Ok(table)
    }

    /// Encode `records` into any sink.
    ///
    /// The sheet is created if missing and emptied if it already exists, so
    /// it ends up holding exactly the header and one row per record.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a malformed record shape, and any backend
    /// write failure unchanged.
    pub fn encode_into<T, S>(&self, sink: &mut S, records: &[T]) -> MapResult<()>
    where
        T: Record,
        S: TableSink + ?Sized,
    {
        let schema = Schema::<T>::extract()?;
        let sheet = self.sheet_name.as_str();
        self.write_header(sink, schema.fields())?;

        let mut row = 1;
        for record in records {
            row += 1;
            for (column, field) in schema.fields().iter().enumerate() {
                sink.set_cell(sheet, CellRef::new(column, row), schema.get(field.slot, record))?;
            }
        }

        sink.set_active_sheet(sheet)?;
        tracing::debug!(
            sheet,
            record = schema.shape_name(),
            count = records.len(),
            "encoded records"
        );
        Ok(())
    }

    /// Create or empty the sheet, apply tagged widths and write the label row.
    ///
    /// # Errors
    ///
    /// Any backend write failure unchanged.
    pub fn write_header<S>(&self, sink: &mut S, fields: &[FieldDescriptor]) -> MapResult<()>
    where
        S: TableSink + ?Sized,
    {
        let sheet = self.sheet_name.as_str();
        sink.ensure_sheet(sheet)?;
        sink.clear_sheet(sheet)?;

        for (column, field) in fields.iter().enumerate() {
            if let Some(width) = field.width() {
                sink.set_column_width(sheet, column, column, width)?;
            }
        }

        for (column, field) in fields.iter().enumerate() {
            sink.set_cell(
                sheet,
                CellRef::new(column, 1),
                CellValue::String(field.label.clone()),
            )?;
        }
        Ok(())
    }
}

/// Encode `records` into a single-sheet [`Table`] named `Sheet1`.
pub fn encode<T: Record>(records: &[T]) -> MapResult<Table> {
    Encoder::new().encode(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TableSource;
    use crate::decode::decode;
    use crate::record::{Shape, Slot};

    crate::record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct ExportTest {
            id: String => "ID",
            name: String => "姓名",
            mobile: String => "手机号;width:16",
            age: String => "年龄",
        }
    }

    fn people() -> Vec<ExportTest> {
        [
            ("1", "赵", "111111111", "10"),
            ("2", "钱", "222222222", "20"),
            ("3", "孙", "333333333", "30"),
            ("4", "李", "444444444", "40"),
        ]
        .into_iter()
        .map(|(id, name, mobile, age)| ExportTest {
            id: id.into(),
            name: name.into(),
            mobile: mobile.into(),
            age: age.into(),
        })
        .collect()
    }

    #[test]
    fn test_header_then_rows() {
        let mut table = encode(&people()).unwrap();
        let rows = table.read_rows(DEFAULT_SHEET_NAME).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], vec!["ID", "姓名", "手机号", "年龄"]);
        assert_eq!(rows[1], vec!["1", "赵", "111111111", "10"]);
        assert_eq!(rows[4], vec!["4", "李", "444444444", "40"]);
        assert_eq!(table.active_sheet(), Some(DEFAULT_SHEET_NAME));
    }

    #[test]
    fn test_width_directive_only_for_tagged_width() {
        let table = encode(&people()).unwrap();
        assert_eq!(table.column_widths(DEFAULT_SHEET_NAME), vec![(2, 16.0)]);
    }

    #[test]
    fn test_roundtrip() {
        let mut table = encode(&people()).unwrap();
        let decoded: Vec<ExportTest> = decode(&mut table).unwrap();
        assert_eq!(decoded, people());
    }

    #[test]
    fn test_empty_records_still_write_header() {
        let table = Encoder::new()
            .with_sheet_name("People")
            .encode::<ExportTest>(&[])
            .unwrap();
        let rows = table.rows("People").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(table.get("People", "D1").unwrap(), Some(&CellValue::from("年龄")));
    }

    crate::record! {
        #[derive(Default)]
        struct Native {
            count: i64 => "Count",
            ratio: f64 => "Ratio",
            active: bool => "Active",
            note: Option<String> => "Note",
        }
    }

    #[test]
    fn test_native_values_are_not_text() {
        let table = encode(&[Native {
            count: 3,
            ratio: 0.5,
            active: true,
            note: None,
        }])
        .unwrap();
        let rows = table.rows(DEFAULT_SHEET_NAME).unwrap();
        assert_eq!(
            rows[1],
            vec![
                CellValue::Int(3),
                CellValue::Float(0.5),
                CellValue::Bool(true),
                CellValue::Null,
            ]
        );
    }

    #[derive(Default)]
    struct Nameless;

    impl Record for Nameless {
        fn shape() -> Shape<Self> {
            Shape::new("Nameless").slot(Slot::untagged(""))
        }
    }

    #[test]
    fn test_malformed_shape_is_invalid_argument() {
        let err = encode(&[Nameless]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_write_header_from_tags() {
        let fields: Vec<_> = ["ID", "Notes;width:40"]
            .iter()
            .enumerate()
            .map(|(slot, tag)| FieldDescriptor::from_tag(tag, slot))
            .collect();
        let mut table = Table::new();
        Encoder::new().write_header(&mut table, &fields).unwrap();

        assert_eq!(table.read_rows(DEFAULT_SHEET_NAME).unwrap(), vec![vec!["ID", "Notes"]]);
        assert_eq!(table.column_widths(DEFAULT_SHEET_NAME), vec![(1, 40.0)]);
    }

    #[test]
    fn test_encode_into_existing_sink() {
        let mut table = Table::with_sheet("Other");
        Encoder::new().encode_into(&mut table, &people()[..1]).unwrap();
        assert_eq!(table.sheet_count(), 2);
        assert_eq!(table.rows(DEFAULT_SHEET_NAME).unwrap().len(), 2);
    }

    #[test]
    fn test_encode_into_replaces_previous_sheet_content() {
        let mut table = Table::with_sheet(DEFAULT_SHEET_NAME);
        for row in 1..=5 {
            table
                .set_cell(DEFAULT_SHEET_NAME, CellRef::new(0, row), CellValue::from("old"))
                .unwrap();
        }
        table.set_column_width(DEFAULT_SHEET_NAME, 4, 4, 30.0).unwrap();

        Encoder::new().encode_into(&mut table, &people()[..1]).unwrap();

        let rows = table.read_rows(DEFAULT_SHEET_NAME).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["ID", "姓名", "手机号", "年龄"],
                vec!["1", "赵", "111111111", "10"],
            ]
        );
        assert_eq!(table.column_widths(DEFAULT_SHEET_NAME), vec![(2, 16.0)]);

        let decoded: Vec<ExportTest> = decode(&mut table).unwrap();
        assert_eq!(decoded, people()[..1]);
    }
}
