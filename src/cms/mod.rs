//! CMS-facing response contract.
//!
//! # Data Flow
//! ```text
//! site.rs (content core)
//!     → CmsResponse (this module)
//!         → http.rs   (HttpCmsResponse: delegates onto a ServletResponse)
//!         → export.rs (ExportResponse: writes into a file or stdout)
//! ```
//!
//! # Design Decisions
//! - The content core only sees `CmsResponse`; it never names a transport
//! - `ResponseKind` lets callers special-case a transport without downcasting
//! - `OriginalResponse` is a closed sum type instead of an untyped handle

pub mod export;
pub mod http;
pub mod site;

use std::fmt;
use std::io::Write;

use crate::error::TransportError;
use crate::servlet::ServletResponse;

pub use export::{export_page, ExportRecord, ExportResponse};
pub use http::HttpCmsResponse;
pub use site::{Outcome, Site};

/// Transport a `CmsResponse` was created from.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Servlet container over HTTP.
    Http = 0,
    /// Static export into a byte sink.
    Export = 1,
}

impl ResponseKind {
    /// Numeric tag of the kind.
    pub fn tag(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseKind::Http => "http",
            ResponseKind::Export => "export",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The transport object behind a `CmsResponse`.
pub enum OriginalResponse<'r> {
    Http(&'r dyn ServletResponse),
    Export(&'r ExportRecord),
}

impl OriginalResponse<'_> {
    pub fn kind(&self) -> ResponseKind {
        match self {
            OriginalResponse::Http(_) => ResponseKind::Http,
            OriginalResponse::Export(_) => ResponseKind::Export,
        }
    }
}

/// Response interface used by the content core.
pub trait CmsResponse {
    /// Writer for the response body.
    fn output_stream(&mut self) -> Result<&mut dyn Write, TransportError>;

    /// Declare the number of body bytes. Must precede the body; not enforced.
    fn set_content_length(&mut self, len: u64);

    /// Set the MIME type, passed through verbatim.
    fn set_content_type(&mut self, content_type: &str);

    /// Signal an error status to the client.
    fn send_error(&mut self, code: u16) -> Result<(), TransportError>;

    /// Signal an error status with a human-readable message.
    fn send_error_with_message(&mut self, code: u16, message: &str) -> Result<(), TransportError>;

    /// Redirect to `location`, given relative to the content root.
    fn send_cms_redirect(&mut self, location: &str) -> Result<(), TransportError>;

    /// Transport this response was created from.
    fn kind(&self) -> ResponseKind;

    /// The underlying transport object, for callers that need more than this interface.
    fn original_response(&self) -> OriginalResponse<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(ResponseKind::Http.tag(), 0);
        assert_eq!(ResponseKind::Export.tag(), 1);
        assert_eq!(ResponseKind::Http.to_string(), "http");
    }
}
