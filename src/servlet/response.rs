//! Buffered container response with commit semantics.
//!
//! # Responsibilities
//! - Buffer the body until `buffer_size` is exceeded or the stream is flushed
//! - Freeze status and headers once committed
//! - Render error pages and redirects, completing the response
//! - Convert into an axum response at the end of the cycle
//!
//! # Design Decisions
//! - Header setters after commit are ignored, as servlet containers do
//! - Errors and redirects after commit fail with `TransportError::Committed`
//! - A declared content length that disagrees with the body is dropped
//!   rather than sent, since hyper would abort the connection

use std::io::{self, Write};

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, StatusCode},
    response::Response,
};

use super::{ContainerRequest, ServletRequest, ServletResponse};
use crate::error::TransportError;

/// Default number of body bytes buffered before the response commits.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Response body buffer. Commits once it grows past `buffer_size` or is flushed.
#[derive(Debug)]
struct ResponseBody {
    bytes: Vec<u8>,
    buffer_size: usize,
    committed: bool,
}

impl Write for ResponseBody {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        if self.bytes.len() > self.buffer_size {
            self.committed = true;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.committed = true;
        Ok(())
    }
}

/// A response owned by the container for one request cycle.
#[derive(Debug)]
pub struct ContainerResponse {
    status: StatusCode,
    content_type: Option<String>,
    content_length: Option<u64>,
    location: Option<HeaderValue>,
    body: ResponseBody,
    head: bool,
    completed: bool,
}

impl ContainerResponse {
    /// Create an empty `200 OK` response.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            content_length: None,
            location: None,
            body: ResponseBody {
                bytes: Vec::new(),
                buffer_size,
                committed: false,
            },
            head: false,
            completed: false,
        }
    }

    /// Create a response for `request`; `HEAD` requests never carry a body.
    pub fn for_request(request: &ContainerRequest, buffer_size: usize) -> Self {
        let mut response = Self::new(buffer_size);
        response.head = *request.method() == Method::HEAD;
        response
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_ref().and_then(|v| v.to_str().ok())
    }

    /// Bytes written so far.
    pub fn body(&self) -> &[u8] {
        &self.body.bytes
    }

    /// Whether an error or a redirect finished the response.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Commit the response without writing anything.
    pub fn flush_buffer(&mut self) {
        self.body.committed = true;
    }

    /// Convert into the axum response sent to the client.
    pub fn into_response(self) -> Response {
        let mut builder = Response::builder().status(self.status);

        if let Some(content_type) = &self.content_type {
            match HeaderValue::from_str(content_type) {
                Ok(value) => builder = builder.header(header::CONTENT_TYPE, value),
                Err(_) => tracing::warn!(content_type = %content_type, "Dropping invalid content type"),
            }
        }

        if let Some(len) = self.content_length {
            let actual = self.body.bytes.len() as u64;
            if self.head || len == actual {
                builder = builder.header(header::CONTENT_LENGTH, len);
            } else {
                tracing::warn!(declared = len, actual, "Dropping mismatched content length");
            }
        }

        if let Some(location) = self.location {
            builder = builder.header(header::LOCATION, location);
        }

        let body = if self.head {
            Body::empty()
        } else {
            Body::from(self.body.bytes)
        };

        builder.body(body).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build response");
            let mut fallback = Response::new(Body::empty());
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }

    fn reset_for(&mut self, code: u16) -> Result<(), TransportError> {
        if self.is_committed() {
            return Err(TransportError::Committed);
        }
        self.status = StatusCode::from_u16(code).map_err(|_| TransportError::InvalidStatus(code))?;
        self.body.bytes.clear();
        self.content_length = None;
        Ok(())
    }

    fn write_error_page(&mut self, message: Option<&str>) {
        let code = self.status.as_u16();
        let reason = self.status.canonical_reason().unwrap_or("Error");
        let mut page = format!(
            "<html><head><title>Error {code}</title></head><body><h1>{code} {reason}</h1>"
        );
        if let Some(message) = message {
            page.push_str("<p>");
            page.push_str(&escape_html(message));
            page.push_str("</p>");
        }
        page.push_str("</body></html>");

        self.content_type = Some("text/html; charset=utf-8".to_string());
        self.body.bytes = page.into_bytes();
        self.completed = true;
    }
}

impl ServletResponse for ContainerResponse {
    fn output_stream(&mut self) -> Result<&mut dyn Write, TransportError> {
        if self.completed {
            return Err(TransportError::Closed);
        }
        Ok(&mut self.body)
    }

    fn set_content_length(&mut self, len: u64) {
        if self.is_committed() {
            tracing::debug!(len, "Ignoring content length on committed response");
            return;
        }
        self.content_length = Some(len);
    }

    fn set_content_type(&mut self, content_type: &str) {
        if self.is_committed() {
            tracing::debug!(content_type = %content_type, "Ignoring content type on committed response");
            return;
        }
        self.content_type = Some(content_type.to_string());
    }

    fn send_error(&mut self, code: u16) -> Result<(), TransportError> {
        self.reset_for(code)?;
        self.write_error_page(None);
        Ok(())
    }

    fn send_error_with_message(&mut self, code: u16, message: &str) -> Result<(), TransportError> {
        self.reset_for(code)?;
        self.write_error_page(Some(message));
        Ok(())
    }

    fn send_redirect(&mut self, location: &str) -> Result<(), TransportError> {
        if self.is_committed() {
            return Err(TransportError::Committed);
        }
        let value = HeaderValue::from_str(location)
            .map_err(|_| TransportError::InvalidHeader(location.to_string()))?;

        self.reset_for(StatusCode::FOUND.as_u16())?;
        self.location = Some(value);
        self.completed = true;
        Ok(())
    }

    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn is_committed(&self) -> bool {
        self.body.committed || self.completed
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
