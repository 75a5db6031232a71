//! `CmsResponse` that renders into a byte sink instead of a client.
//!
//! Used by the `export` command to dump a single page into a file or stdout.
//! Everything the content core declares (status, content type, length,
//! redirect target) is collected into an `ExportRecord`.

use std::io::{self, Write};

use axum::http::Method;
use serde::Serialize;

use super::{CmsResponse, OriginalResponse, Outcome, ResponseKind, Site};
use crate::error::TransportError;

/// Metadata collected while exporting one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub redirect: Option<String>,
    pub message: Option<String>,
    pub bytes_written: u64,
}

impl Default for ExportRecord {
    fn default() -> Self {
        Self {
            status: 200,
            content_type: None,
            content_length: None,
            redirect: None,
            message: None,
            bytes_written: 0,
        }
    }
}

/// Sink that keeps the record's byte count current.
struct ExportSink<W> {
    inner: W,
    record: ExportRecord,
}

impl<W: Write> Write for ExportSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.record.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Export-backed `CmsResponse`.
pub struct ExportResponse<W> {
    sink: ExportSink<W>,
    completed: bool,
}

impl<W: Write> ExportResponse<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: ExportSink {
                inner: sink,
                record: ExportRecord::default(),
            },
            completed: false,
        }
    }

    /// Snapshot of what has been declared so far.
    pub fn record(&self) -> ExportRecord {
        self.sink.record.clone()
    }

    /// Flush the sink and hand back the record and the sink.
    pub fn finish(mut self) -> Result<(ExportRecord, W), TransportError> {
        self.sink.flush()?;
        Ok((self.sink.record, self.sink.inner))
    }

    /// Errors and redirects carry no body, so the page's declarations go too.
    fn complete(&mut self, code: u16) -> Result<(), TransportError> {
        if self.completed || self.sink.record.bytes_written > 0 {
            return Err(TransportError::Committed);
        }
        if !(100..=999).contains(&code) {
            return Err(TransportError::InvalidStatus(code));
        }
        let record = &mut self.sink.record;
        record.status = code;
        record.content_type = None;
        record.content_length = None;
        self.completed = true;
        Ok(())
    }
}

impl<W: Write> CmsResponse for ExportResponse<W> {
    fn output_stream(&mut self) -> Result<&mut dyn Write, TransportError> {
        if self.completed {
            return Err(TransportError::Closed);
        }
        Ok(&mut self.sink)
    }

    fn set_content_length(&mut self, len: u64) {
        self.sink.record.content_length = Some(len);
    }

    fn set_content_type(&mut self, content_type: &str) {
        self.sink.record.content_type = Some(content_type.to_string());
    }

    fn send_error(&mut self, code: u16) -> Result<(), TransportError> {
        self.complete(code)
    }

    fn send_error_with_message(&mut self, code: u16, message: &str) -> Result<(), TransportError> {
        self.complete(code)?;
        self.sink.record.message = Some(message.to_string());
        Ok(())
    }

    fn send_cms_redirect(&mut self, location: &str) -> Result<(), TransportError> {
        self.complete(302)?;
        self.sink.record.redirect = Some(location.to_string());
        Ok(())
    }

    fn kind(&self) -> ResponseKind {
        ResponseKind::Export
    }

    fn original_response(&self) -> OriginalResponse<'_> {
        OriginalResponse::Export(&self.sink.record)
    }
}

/// Render `path` of `site`: the body goes to `body`, the record as pretty JSON to `summary`.
pub fn export_page<B, S>(
    site: &Site,
    path: &str,
    body: B,
    mut summary: S,
) -> Result<(Outcome, ExportRecord), TransportError>
where
    B: Write,
    S: Write,
{
    let mut res = ExportResponse::new(body);
    let outcome = site.serve(&Method::GET, path, &mut res)?;
    tracing::info!(path = %path, kind = %res.kind(), outcome = outcome.as_str(), "Exported");

    let (record, _) = res.finish()?;
    serde_json::to_writer_pretty(&mut summary, &record).map_err(io::Error::from)?;
    writeln!(summary)?;
    summary.flush()?;
    Ok((outcome, record))
}
