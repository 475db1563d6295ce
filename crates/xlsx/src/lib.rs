//! # sheetbind-xlsx
//!
//! Excel (`.xlsx`) backend for sheetbind.
//!
//! [`XlsxReader`] exposes a workbook as a
//! [`TableSource`](sheetbind_core::TableSource) using calamine;
//! [`XlsxWriter`] is a [`TableSink`](sheetbind_core::TableSink) backed by
//! rust_xlsxwriter. The free functions cover the usual entry points: decode
//! records from bytes or a file, and export records to a workbook.
//!
//! ```no_run
//! sheetbind_core::record! {
//!     #[derive(Debug, Default)]
//!     struct Contact {
//!         id: String => "ID",
//!         mobile: String => "手机号;width:16",
//!     }
//! }
//!
//! let contacts: Vec<Contact> = sheetbind_xlsx::read_from_path("contacts.xlsx").unwrap();
//! sheetbind_xlsx::export(&contacts).unwrap().save("copy.xlsx").unwrap();
//! ```

mod error;
mod reader;
mod writer;

pub use error::XlsxError;
pub use reader::XlsxReader;
pub use writer::XlsxWriter;

use sheetbind_core::{Decoder, Encoder, MapResult, Record};
use std::path::Path;

/// Decode records from the first sheet of an xlsx workbook held in memory.
pub fn read_from_bytes<T: Record>(bytes: Vec<u8>) -> MapResult<Vec<T>> {
    read_from_bytes_with(&mut Decoder::new(), bytes)
}

/// Like [`read_from_bytes`], reporting warnings through `decoder`.
pub fn read_from_bytes_with<T: Record>(
    decoder: &mut Decoder<'_>,
    bytes: Vec<u8>,
) -> MapResult<Vec<T>> {
    let mut reader = XlsxReader::from_bytes(bytes)?;
    decoder.decode(&mut reader)
}

/// Decode records from the first sheet of an xlsx file.
pub fn read_from_path<T: Record, P: AsRef<Path>>(path: P) -> MapResult<Vec<T>> {
    let mut reader = XlsxReader::open(path)?;
    Decoder::new().decode(&mut reader)
}

/// Export records into a new workbook with a single `Sheet1`.
pub fn export<T: Record>(records: &[T]) -> MapResult<XlsxWriter> {
    export_with(&Encoder::new(), records)
}

/// Export records using the sheet settings of `encoder`.
pub fn export_with<T: Record>(encoder: &Encoder, records: &[T]) -> MapResult<XlsxWriter> {
    let mut writer = XlsxWriter::new();
    encoder.encode_into(&mut writer, records)?;
    Ok(writer)
}
