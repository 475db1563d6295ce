use sheetbind_core::MapError;
use thiserror::Error;

/// Errors raised by the xlsx backend
#[derive(Error, Debug)]
pub enum XlsxError {
    #[error("Failed to read workbook: {0}")]
    Read(#[from] calamine::XlsxError),

    #[error("Failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cell {cell} is outside the worksheet")]
    OutOfRange { cell: String },
}

impl From<XlsxError> for MapError {
    fn from(err: XlsxError) -> Self {
        MapError::backend(err)
    }
}
