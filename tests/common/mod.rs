//! Shared utilities for integration tests.

use std::io::Write;

use axum::http::Method;
use cms_response::servlet::{ServletRequest, ServletResponse};
use cms_response::TransportError;

/// Request with a fixed servlet path.
pub struct RecordingRequest {
    pub servlet_path: String,
    pub path_info: String,
    pub method: Method,
}

impl RecordingRequest {
    pub fn new(servlet_path: &str) -> Self {
        Self {
            servlet_path: servlet_path.to_string(),
            path_info: "/".to_string(),
            method: Method::GET,
        }
    }
}

impl ServletRequest for RecordingRequest {
    fn servlet_path(&self) -> &str {
        &self.servlet_path
    }

    fn path_info(&self) -> &str {
        &self.path_info
    }

    fn method(&self) -> &Method {
        &self.method
    }
}

/// One call received by `RecordingResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    OutputStream,
    ContentLength(u64),
    ContentType(String),
    Error(u16),
    ErrorWithMessage(u16, String),
    Redirect(String),
}

/// Response that records every call and never renders anything.
#[derive(Default)]
pub struct RecordingResponse {
    pub calls: Vec<Call>,
    pub body: Vec<u8>,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub committed: bool,
    pub closed: bool,
}

impl RecordingResponse {
    pub fn committed() -> Self {
        Self {
            committed: true,
            ..Self::default()
        }
    }

    pub fn closed() -> Self {
        Self {
            closed: true,
            ..Self::default()
        }
    }

    fn check_writable(&self) -> Result<(), TransportError> {
        if self.committed {
            Err(TransportError::Committed)
        } else {
            Ok(())
        }
    }
}

#[allow(dead_code)]
impl RecordingResponse {
    pub fn redirects(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Redirect(location) => Some(location.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ServletResponse for RecordingResponse {
    fn output_stream(&mut self) -> Result<&mut dyn Write, TransportError> {
        self.calls.push(Call::OutputStream);
        if self.closed {
            return Err(TransportError::Closed);
        }
        Ok(&mut self.body)
    }

    fn set_content_length(&mut self, len: u64) {
        self.calls.push(Call::ContentLength(len));
        self.content_length = Some(len);
    }

    fn set_content_type(&mut self, content_type: &str) {
        self.calls.push(Call::ContentType(content_type.to_string()));
        self.content_type = Some(content_type.to_string());
    }

    fn send_error(&mut self, code: u16) -> Result<(), TransportError> {
        self.calls.push(Call::Error(code));
        self.check_writable()?;
        self.committed = true;
        Ok(())
    }

    fn send_error_with_message(&mut self, code: u16, message: &str) -> Result<(), TransportError> {
        self.calls.push(Call::ErrorWithMessage(code, message.to_string()));
        self.check_writable()?;
        self.committed = true;
        Ok(())
    }

    fn send_redirect(&mut self, location: &str) -> Result<(), TransportError> {
        self.calls.push(Call::Redirect(location.to_string()));
        self.check_writable()?;
        self.committed = true;
        Ok(())
    }

    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn is_committed(&self) -> bool {
        self.committed
    }
}
