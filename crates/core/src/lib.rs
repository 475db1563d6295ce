//! # sheetbind-core
//!
//! Maps rows of spreadsheet cells to typed records and back.
//!
//! A record type declares which of its fields map to columns, and with
//! which header label, through the [`record!`] macro. [`decode`] turns the
//! first sheet of a table into records, matching columns by the header row;
//! [`encode`] writes records under a header row built from the labels.
//!
//! The tabular backend is abstract: anything implementing [`TableSource`]
//! can be decoded, anything implementing [`TableSink`] can be encoded into.
//! [`Table`] is the in-memory backend; `sheetbind-xlsx` provides xlsx files.
//!
//! # Examples
//!
//! ```
//! use sheetbind_core::{decode, encode};
//!
//! sheetbind_core::record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Contact {
//!         pub id: String => "ID",
//!         pub name: String => "姓名",
//!         pub mobile: String => "手机号;width:16",
//!     }
//! }
//!
//! let contacts = vec![Contact {
//!     id: "1".into(),
//!     name: "赵".into(),
//!     mobile: "111111111".into(),
//! }];
//!
//! let mut table = encode(&contacts).unwrap();
//! assert_eq!(table.column_width("Sheet1", 2), Some(16.0));
//!
//! let decoded: Vec<Contact> = decode(&mut table).unwrap();
//! assert_eq!(decoded, contacts);
//! ```
//!
//! # Tags
//!
//! A tag is a `;`-separated list: `width:<n>` sets the column width, any
//! other token is the header label (the last one wins). Fields without a
//! tag are left alone by both directions.

mod backend;
mod cell;
mod column;
mod decode;
mod encode;
mod error;
mod field;
mod record;
mod schema;
mod table;

pub use backend::{TableSink, TableSource};
pub use cell::{trim_trailing_empty, CellValue};
pub use column::{column_index, column_name, CellRef};
pub use decode::{decode, DecodeWarning, Decoder};
pub use encode::{encode, Encoder, DEFAULT_SHEET_NAME};
pub use error::{BackendError, FieldError, MapError, MapResult, TableError};
pub use field::CellField;
pub use record::{Getter, Record, Setter, Shape, Slot};
pub use schema::{parse_tag, FieldDescriptor, Schema};
pub use table::{Sheet, Table};
