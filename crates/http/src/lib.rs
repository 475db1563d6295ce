//! # sheetbind-http
//!
//! Fetches workbooks over HTTP and decodes them into records.
//!
//! The request is the only asynchronous step: the body is read fully into
//! memory and then decoded synchronously by `sheetbind-xlsx`.

use reqwest::Client;
use sheetbind_core::{Decoder, MapError, MapResult, Record};
use std::time::Duration;
use thiserror::Error;

/// Request timeout used by [`HttpSource::new`].
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while fetching a workbook.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// The request failed or the body could not be read.
    #[error("HTTP request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} - {reason} ({url})")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },
}

impl From<HttpError> for MapError {
    fn from(err: HttpError) -> Self {
        MapError::backend(err)
    }
}

/// Downloads workbook bytes.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Constructs a source with a 30-second request timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Client` if building the underlying HTTP client fails.
    ///
    /// # Examples
    ///
    /// ```
    /// let source = sheetbind_http::HttpSource::new().expect("failed to create HttpSource");
    /// ```
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Constructs a source with a custom request timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Client` if building the underlying HTTP client fails.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()
            .map_err(HttpError::Client)?;

        Ok(Self { client })
    }

    /// Download the body at `url`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not a success.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let request_err = |source| HttpError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await.map_err(request_err)?;
        tracing::debug!(url, size = body.len(), "fetched workbook");
        Ok(body.to_vec())
    }

    /// Download an xlsx workbook and decode its first sheet.
    pub async fn read<T: Record>(&self, url: &str) -> MapResult<Vec<T>> {
        self.read_with(&mut Decoder::new(), url).await
    }

    /// Like [`HttpSource::read`], reporting warnings through `decoder`.
    pub async fn read_with<T: Record>(
        &self,
        decoder: &mut Decoder<'_>,
        url: &str,
    ) -> MapResult<Vec<T>> {
        let bytes = self.fetch_bytes(url).await?;
        sheetbind_xlsx::read_from_bytes_with(decoder, bytes)
    }
}

/// Download the body at `url` with a default [`HttpSource`].
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, HttpError> {
    HttpSource::new()?.fetch_bytes(url).await
}

/// Download an xlsx workbook and decode its first sheet into records.
///
/// ```no_run
/// sheetbind_core::record! {
///     #[derive(Debug, Default)]
///     struct Contact { id: String => "ID" }
/// }
///
/// # async fn run() -> sheetbind_core::MapResult<()> {
/// let contacts: Vec<Contact> =
///     sheetbind_http::read_from_url("https://example.com/contacts.xlsx").await?;
/// # Ok(())
/// # }
/// ```
pub async fn read_from_url<T: Record>(url: &str) -> MapResult<Vec<T>> {
    HttpSource::new()?.read(url).await
}
